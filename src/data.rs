//! Dataset loading and the summary statistics shown on the Dataset page.

use std::env;
use std::fs::File;
use std::path::{Path, PathBuf};

use dotenv::dotenv;
use polars::prelude::*;
use thiserror::Error;

use crate::models::Measurement;

pub const DATASET_ENV: &str = "IRIS_DATASET";
pub const DEFAULT_DATASET_PATH: &str = "iris.csv";

pub const FEATURE_COLUMNS: [&str; 4] = [
    "sepal_length",
    "sepal_width",
    "petal_length",
    "petal_width",
];
pub const SPECIES_COLUMN: &str = "species";

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read tabular data: {0}")]
    Csv(#[from] PolarsError),
    #[error("missing column '{0}'")]
    MissingColumn(String),
}

pub fn dataset_path() -> PathBuf {
    env::var(DATASET_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATASET_PATH))
}

pub fn get_infer_schema_length() -> usize {
    dotenv().ok();
    match env::var("INFER_SCHEMA_LENGTH") {
        Ok(val) => val.parse::<usize>().unwrap_or(1_000_000),
        Err(_) => 1_000_000,
    }
}

pub fn load_csv_dataset<P: AsRef<Path>>(
    file_path: P,
    infer_schema_length: Option<usize>,
) -> Result<DataFrame, DataError> {
    let schema_length = infer_schema_length.unwrap_or_else(get_infer_schema_length);
    let file = File::open(file_path.as_ref()).map_err(|source| DataError::Open {
        path: file_path.as_ref().to_path_buf(),
        source,
    })?;
    let df = CsvReader::new(file)
        .with_options(
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(Some(schema_length)),
        )
        .finish()?
        .with_row_index(PlSmallStr::from("Index"), Some(0))?;

    Ok(df)
}

/// Pull the four measurement columns and the species label out of the frame
/// into typed rows. Column order in the CSV does not matter; names do.
pub fn extract_records(df: &DataFrame) -> Result<Vec<Measurement>, DataError> {
    let mut numeric: Vec<Vec<f64>> = Vec::with_capacity(FEATURE_COLUMNS.len());
    for name in FEATURE_COLUMNS {
        let column = df
            .column(name)
            .map_err(|_| DataError::MissingColumn(name.to_string()))?
            .cast(&DataType::Float64)?;
        let values: Vec<f64> = column
            .f64()?
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect();
        numeric.push(values);
    }

    let species_column = df
        .column(SPECIES_COLUMN)
        .map_err(|_| DataError::MissingColumn(SPECIES_COLUMN.to_string()))?
        .cast(&DataType::String)?;
    let species: Vec<String> = species_column
        .str()?
        .into_iter()
        .map(|value| value.unwrap_or("").to_string())
        .collect();

    let records = species
        .into_iter()
        .enumerate()
        .map(|(row, species)| Measurement {
            sepal_length: numeric[0][row],
            sepal_width: numeric[1][row],
            petal_length: numeric[2][row],
            petal_width: numeric[3][row],
            species,
        })
        .collect();

    Ok(records)
}

/// Describe-style statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub name: &'static str,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Compute count/mean/std/min/quartiles/max for each measurement column.
pub fn summarize(records: &[Measurement]) -> Vec<ColumnSummary> {
    if records.is_empty() {
        return Vec::new();
    }

    let accessors: [(&'static str, fn(&Measurement) -> f64); 4] = [
        ("sepal_length", |m| m.sepal_length),
        ("sepal_width", |m| m.sepal_width),
        ("petal_length", |m| m.petal_length),
        ("petal_width", |m| m.petal_width),
    ];

    accessors
        .into_iter()
        .map(|(name, accessor)| {
            let mut values: Vec<f64> = records.iter().map(accessor).collect();
            values.sort_by(|a, b| a.total_cmp(b));
            summarize_column(name, &values)
        })
        .collect()
}

fn summarize_column(name: &'static str, sorted: &[f64]) -> ColumnSummary {
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let variance = sorted
            .iter()
            .map(|value| (value - mean).powi(2))
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        0.0
    };

    ColumnSummary {
        name,
        count,
        mean,
        std,
        min: sorted[0],
        q1: quantile(sorted, 0.25),
        median: quantile(sorted, 0.5),
        q3: quantile(sorted, 0.75),
        max: sorted[count - 1],
    }
}

// Linear interpolation between order statistics, matching the convention the
// training notebook's describe() output used.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let low = position.floor() as usize;
    let high = position.ceil() as usize;
    if low == high {
        sorted[low]
    } else {
        sorted[low] + (position - low as f64) * (sorted[high] - sorted[low])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_sample_csv(dir: &Path) -> PathBuf {
        let path = dir.join("flowers.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "sepal_length,sepal_width,petal_length,petal_width,species").unwrap();
        writeln!(file, "5.1,3.5,1.4,0.2,Iris-setosa").unwrap();
        writeln!(file, "7.0,3.2,4.7,1.4,Iris-versicolor").unwrap();
        writeln!(file, "6.3,3.3,6.0,2.5,Iris-virginica").unwrap();
        path
    }

    fn row(sl: f64, sw: f64, pl: f64, pw: f64) -> Measurement {
        Measurement {
            sepal_length: sl,
            sepal_width: sw,
            petal_length: pl,
            petal_width: pw,
            species: "Iris-setosa".to_string(),
        }
    }

    #[test]
    fn loads_csv_and_extracts_typed_rows() {
        let dir = tempdir().unwrap();
        let df = load_csv_dataset(write_sample_csv(dir.path()), Some(100)).unwrap();
        assert_eq!(df.height(), 3);

        let records = extract_records(&df).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].species, "Iris-setosa");
        assert!((records[1].petal_length - 4.7).abs() < 1e-9);
        assert!((records[2].petal_width - 2.5).abs() < 1e-9);
    }

    #[test]
    fn missing_file_is_an_error_not_a_panic() {
        let dir = tempdir().unwrap();
        let err = load_csv_dataset(dir.path().join("nope.csv"), Some(100)).unwrap_err();
        assert!(matches!(err, DataError::Open { .. }));
    }

    #[test]
    fn missing_species_column_is_reported_by_name() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("unlabeled.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "sepal_length,sepal_width,petal_length,petal_width").unwrap();
        writeln!(file, "5.1,3.5,1.4,0.2").unwrap();

        let df = load_csv_dataset(&path, Some(100)).unwrap();
        let err = extract_records(&df).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn(name) if name == "species"));
    }

    #[test]
    fn summary_matches_direct_computation() {
        let records = vec![
            row(1.0, 3.5, 1.4, 0.2),
            row(2.0, 3.0, 1.4, 0.2),
            row(3.0, 3.2, 1.3, 0.2),
            row(4.0, 3.1, 1.5, 0.2),
        ];
        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 4);

        let sepal_length = &summaries[0];
        assert_eq!(sepal_length.name, "sepal_length");
        assert_eq!(sepal_length.count, 4);
        assert!((sepal_length.mean - 2.5).abs() < 1e-9);
        assert!((sepal_length.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((sepal_length.min - 1.0).abs() < 1e-9);
        assert!((sepal_length.q1 - 1.75).abs() < 1e-9);
        assert!((sepal_length.median - 2.5).abs() < 1e-9);
        assert!((sepal_length.q3 - 3.25).abs() < 1e-9);
        assert!((sepal_length.max - 4.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_no_rows_is_empty() {
        assert!(summarize(&[]).is_empty());
    }
}
