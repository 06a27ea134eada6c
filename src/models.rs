use eframe::egui::TextureHandle;
use polars::prelude::DataFrame;
use std::ops::RangeInclusive;

use crate::data;
use crate::model::{self, SpeciesModel};

#[derive(PartialEq, Debug, Clone, Copy)]
pub enum Page {
    About,
    Dataset,
    Eda,
    DataCleaning,
    MachineLearning,
    Prediction,
    Conclusion,
}

impl Page {
    pub const ALL: [Page; 7] = [
        Page::About,
        Page::Dataset,
        Page::Eda,
        Page::DataCleaning,
        Page::MachineLearning,
        Page::Prediction,
        Page::Conclusion,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Page::About => "About",
            Page::Dataset => "Dataset",
            Page::Eda => "EDA",
            Page::DataCleaning => "Data Cleaning / Pre-processing",
            Page::MachineLearning => "Machine Learning",
            Page::Prediction => "Prediction",
            Page::Conclusion => "Conclusion",
        }
    }
}

/// One labeled row of the Iris dataset, all measurements in centimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub sepal_length: f64,
    pub sepal_width: f64,
    pub petal_length: f64,
    pub petal_width: f64,
    pub species: String,
}

pub const SEPAL_LENGTH_RANGE: RangeInclusive<f32> = 4.0..=8.0;
pub const SEPAL_WIDTH_RANGE: RangeInclusive<f32> = 2.0..=5.0;
pub const PETAL_LENGTH_RANGE: RangeInclusive<f32> = 0.0..=7.0;
pub const PETAL_WIDTH_RANGE: RangeInclusive<f32> = 0.0..=3.0;
pub const SLIDER_STEP: f64 = 0.1;

/// Current positions of the four prediction sliders.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub sepal_length: f32,
    pub sepal_width: f32,
    pub petal_length: f32,
    pub petal_width: f32,
}

impl Default for PredictionInput {
    fn default() -> Self {
        Self {
            sepal_length: 5.0,
            sepal_width: 3.0,
            petal_length: 1.5,
            petal_width: 0.2,
        }
    }
}

impl PredictionInput {
    /// Feature vector in the column order the model was trained on.
    pub fn features(&self) -> [f32; 4] {
        [
            self.sepal_length,
            self.sepal_width,
            self.petal_length,
            self.petal_width,
        ]
    }
}

pub struct AppState {
    pub selected_page: Page,
    pub df: Option<DataFrame>,
    pub records: Vec<Measurement>,
    pub dataset_error: Option<String>,
    pub model: Option<SpeciesModel>,
    pub model_error: Option<String>,
    pub input: PredictionInput,
    pub predicted: Option<String>,
    pub predict_error: Option<String>,
    pub quick_entry: String,
    pub about_texture: Option<TextureHandle>,
    pub about_image_failed: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            selected_page: Page::About,
            df: None,
            records: Vec::new(),
            dataset_error: None,
            model: None,
            model_error: None,
            input: PredictionInput::default(),
            predicted: None,
            predict_error: None,
            quick_entry: String::new(),
            about_texture: None,
            about_image_failed: false,
        }
    }
}

impl AppState {
    /// Load the dataset and the model artifact once, at startup. Failures
    /// become inline page messages instead of aborting.
    pub fn load() -> Self {
        let mut state = Self::default();

        let dataset_path = data::dataset_path();
        match data::load_csv_dataset(&dataset_path, None) {
            Ok(df) => {
                match data::extract_records(&df) {
                    Ok(records) => {
                        tracing::info!(
                            rows = records.len(),
                            path = %dataset_path.display(),
                            "dataset loaded"
                        );
                        state.records = records;
                    }
                    Err(err) => {
                        tracing::error!(%err, "dataset rows not usable");
                        state.dataset_error =
                            Some(format!("Dataset loaded but not usable: {err}"));
                    }
                }
                state.df = Some(df);
            }
            Err(err) => {
                tracing::error!(%err, "dataset not loaded");
                state.dataset_error = Some(format!("Could not load the dataset: {err}"));
            }
        }

        let model_path = model::model_path();
        match SpeciesModel::load_json(&model_path) {
            Ok(loaded) => {
                tracing::info!(
                    classes = loaded.classes.len(),
                    path = %model_path.display(),
                    "model loaded"
                );
                state.model = Some(loaded);
            }
            Err(err) => {
                tracing::error!(%err, "model not loaded");
                state.model_error = Some(format!("Could not load the model: {err}"));
            }
        }

        state
    }

    pub fn select_page(&mut self, page: Page) {
        self.selected_page = page;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seven_pages_with_unique_labels() {
        assert_eq!(Page::ALL.len(), 7);
        let labels: HashSet<&str> = Page::ALL.iter().map(|page| page.label()).collect();
        assert_eq!(labels.len(), 7);
    }

    #[test]
    fn default_page_is_about() {
        assert_eq!(AppState::default().selected_page, Page::About);
    }

    #[test]
    fn selecting_a_page_sets_exactly_that_page() {
        let mut state = AppState::default();
        for page in Page::ALL {
            state.select_page(page);
            assert_eq!(state.selected_page, page);
        }
    }

    #[test]
    fn default_input_matches_slider_defaults() {
        assert_eq!(
            PredictionInput::default().features(),
            [5.0, 3.0, 1.5, 0.2]
        );
    }

    #[test]
    fn slider_ranges_contain_their_defaults() {
        let input = PredictionInput::default();
        assert!(SEPAL_LENGTH_RANGE.contains(&input.sepal_length));
        assert!(SEPAL_WIDTH_RANGE.contains(&input.sepal_width));
        assert!(PETAL_LENGTH_RANGE.contains(&input.petal_length));
        assert!(PETAL_WIDTH_RANGE.contains(&input.petal_width));
    }
}
