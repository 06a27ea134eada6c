//! The pre-trained species classifier artifact.
//!
//! The dashboard treats the artifact as opaque: deserialize it from JSON,
//! check its structural invariants, and map a four-feature vector to a class
//! label. Training happened elsewhere (see the notebook linked from the
//! sidebar); nothing here updates the model.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MODEL_ENV: &str = "IRIS_MODEL";
pub const DEFAULT_MODEL_PATH: &str = "assets/model/iris_classifier.json";

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file not found at {0}")]
    Missing(PathBuf),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to deserialize model: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid model: {0}")]
    Invalid(String),
    #[error("expected {expected} features, got {actual}")]
    FeatureLen { expected: usize, actual: usize },
}

pub fn model_path() -> PathBuf {
    env::var(MODEL_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_MODEL_PATH))
}

/// Single-node decision tree used as a weak learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stump {
    /// Measurement index used for the split.
    pub feature_index: usize,
    /// Threshold in feature units (centimeters).
    pub threshold: f32,
    /// Contribution for `feature <= threshold`.
    pub left_value: f32,
    /// Contribution for `feature > threshold`.
    pub right_value: f32,
}

impl Stump {
    fn score(&self, features: &[f32]) -> f32 {
        let value = features.get(self.feature_index).copied().unwrap_or(0.0);
        if value <= self.threshold {
            self.left_value
        } else {
            self.right_value
        }
    }
}

/// Boosted-stump classifier over the four Iris measurements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesModel {
    /// Artifact format version.
    pub model_version: i64,
    /// Number of values expected per feature vector.
    pub feature_len: usize,
    /// Ordered class labels; predictions are drawn from this list verbatim.
    pub classes: Vec<String>,
    /// Learning rate applied to each stump contribution.
    pub learning_rate: f32,
    /// Raw per-class scores before any boosting round.
    pub init_raw: Vec<f32>,
    /// Shape: `[n_rounds][n_classes]`.
    pub stumps: Vec<Vec<Stump>>,
}

impl SpeciesModel {
    /// Load a model from a JSON file, checking existence first so a missing
    /// artifact reads as its own error rather than a generic I/O failure.
    pub fn load_json(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::Missing(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_slice(&bytes)?;
        model.validate()?;
        Ok(model)
    }

    /// Validate structural invariants of the artifact.
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.classes.len() < 2 {
            return Err(ModelError::Invalid(
                "model must contain at least 2 classes".to_string(),
            ));
        }
        if self.init_raw.len() != self.classes.len() {
            return Err(ModelError::Invalid(format!(
                "init_raw has {} entries but there are {} classes",
                self.init_raw.len(),
                self.classes.len()
            )));
        }
        for (round_idx, round) in self.stumps.iter().enumerate() {
            if round.len() != self.classes.len() {
                return Err(ModelError::Invalid(format!(
                    "round {round_idx} has {} stumps but expected {}",
                    round.len(),
                    self.classes.len()
                )));
            }
            for stump in round {
                if stump.feature_index >= self.feature_len {
                    return Err(ModelError::Invalid(format!(
                        "round {round_idx} splits on feature {} but only {} exist",
                        stump.feature_index, self.feature_len
                    )));
                }
            }
        }
        Ok(())
    }

    fn raw_scores(&self, features: &[f32]) -> Vec<f32> {
        let mut raw = self.init_raw.clone();
        for round in &self.stumps {
            for (class_idx, stump) in round.iter().enumerate() {
                raw[class_idx] += self.learning_rate * stump.score(features);
            }
        }
        raw
    }

    /// Map a feature vector to the winning class label.
    pub fn predict(&self, features: &[f32]) -> Result<&str, ModelError> {
        if features.len() != self.feature_len {
            return Err(ModelError::FeatureLen {
                expected: self.feature_len,
                actual: features.len(),
            });
        }
        if self.classes.is_empty() {
            return Err(ModelError::Invalid("model has no classes".to_string()));
        }
        let raw = self.raw_scores(features);
        Ok(self.classes[argmax(&raw)].as_str())
    }
}

fn argmax(values: &[f32]) -> usize {
    let mut best_idx = 0usize;
    let mut best_val = f32::NEG_INFINITY;
    for (idx, &value) in values.iter().enumerate() {
        if value > best_val {
            best_val = value;
            best_idx = idx;
        }
    }
    best_idx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn tiny_model() -> SpeciesModel {
        SpeciesModel {
            model_version: 1,
            feature_len: 4,
            classes: vec![
                "Iris-setosa".to_string(),
                "Iris-versicolor".to_string(),
                "Iris-virginica".to_string(),
            ],
            learning_rate: 1.0,
            init_raw: vec![0.0, 0.0, 0.0],
            stumps: vec![vec![
                Stump {
                    feature_index: 2,
                    threshold: 2.45,
                    left_value: 4.0,
                    right_value: -4.0,
                },
                Stump {
                    feature_index: 3,
                    threshold: 1.75,
                    left_value: 2.0,
                    right_value: -2.0,
                },
                Stump {
                    feature_index: 3,
                    threshold: 1.75,
                    left_value: -2.0,
                    right_value: 2.0,
                },
            ]],
        }
    }

    #[test]
    fn stump_picks_side_by_threshold() {
        let stump = Stump {
            feature_index: 0,
            threshold: 0.5,
            left_value: -1.0,
            right_value: 2.0,
        };
        assert_eq!(stump.score(&[0.0]), -1.0);
        assert_eq!(stump.score(&[0.5]), -1.0);
        assert_eq!(stump.score(&[0.6]), 2.0);
    }

    #[test]
    fn predicts_each_species_from_canonical_measurements() {
        let model = tiny_model();
        assert_eq!(model.predict(&[5.0, 3.0, 1.5, 0.2]).unwrap(), "Iris-setosa");
        assert_eq!(
            model.predict(&[6.0, 2.9, 4.5, 1.3]).unwrap(),
            "Iris-versicolor"
        );
        assert_eq!(
            model.predict(&[6.5, 3.0, 5.5, 2.0]).unwrap(),
            "Iris-virginica"
        );
    }

    #[test]
    fn label_comes_verbatim_from_the_artifact() {
        let mut model = tiny_model();
        model.classes[0] = "Setosa (relabeled)".to_string();
        assert_eq!(
            model.predict(&[5.0, 3.0, 1.5, 0.2]).unwrap(),
            "Setosa (relabeled)"
        );
    }

    #[test]
    fn wrong_feature_count_is_an_error() {
        let err = tiny_model().predict(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ModelError::FeatureLen {
                expected: 4,
                actual: 1
            }
        ));
    }

    #[test]
    fn missing_file_is_its_own_error() {
        let dir = tempdir().unwrap();
        let err = SpeciesModel::load_json(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, ModelError::Missing(_)));
    }

    #[test]
    fn corrupt_file_reports_the_cause() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "not a model").unwrap();

        let err = SpeciesModel::load_json(&path).unwrap_err();
        assert!(matches!(err, ModelError::Json(_)));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn load_json_roundtrips_a_written_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, serde_json::to_vec(&tiny_model()).unwrap()).unwrap();

        let loaded = SpeciesModel::load_json(&path).unwrap();
        assert_eq!(loaded.predict(&[5.0, 3.0, 1.5, 0.2]).unwrap(), "Iris-setosa");
    }

    #[test]
    fn validate_rejects_mismatched_round_width() {
        let mut model = tiny_model();
        model.stumps[0].pop();
        assert!(matches!(model.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_init_raw_length_mismatch() {
        let mut model = tiny_model();
        model.init_raw.push(0.0);
        assert!(matches!(model.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_out_of_range_feature_index() {
        let mut model = tiny_model();
        model.stumps[0][0].feature_index = 9;
        assert!(matches!(model.validate(), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn shipped_artifact_classifies_the_default_sliders_as_setosa() {
        let model = SpeciesModel::load_json(Path::new(DEFAULT_MODEL_PATH)).unwrap();
        assert_eq!(model.predict(&[5.0, 3.0, 1.5, 0.2]).unwrap(), "Iris-setosa");
    }
}
