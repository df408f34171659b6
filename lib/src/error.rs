//! Error type shared by the loader, trainer, cache and prediction service.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, PotabilityError>;

/// Everything that can stop the measurement path.
///
/// The rule-based survey path never fails and has no variant here.
#[derive(Debug, Error)]
pub enum PotabilityError {
    /// The tabular training source does not exist. Fatal for the measurement path.
    #[error("data source not found: {}", path.display())]
    DataSourceNotFound { path: PathBuf },

    /// I/O error while reading a source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited data (unequal row lengths, bad quoting, ...).
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON configuration.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A required column is absent from the header.
    #[error("missing column: {0}")]
    MissingColumn(String),

    /// A label cell is not `0` or `1`. `row` is 1-based and excludes the header.
    #[error("invalid label at row {row}: {value:?} (expected 0 or 1)")]
    InvalidLabel { row: usize, value: String },

    /// Data contains missing values (NaN) where none are allowed.
    #[error("missing values: {0}")]
    MissingValues(String),

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Column count differs from the one seen at fit time.
    #[error("feature mismatch: expected {expected_features} features, got {got_features}")]
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },

    /// A feature vector was assembled for a different column order than the model's.
    #[error("feature order mismatch: model expects [{}], got [{}]", expected.join(", "), got.join(", "))]
    FeatureOrderMismatch { expected: Vec<String>, got: Vec<String> },

    /// A dataset column does not name any known water-quality measurement.
    #[error("unknown feature column: {0}")]
    UnknownFeature(String),

    /// Two dataset columns resolve to the same measurement.
    #[error("duplicate feature column: {0}")]
    DuplicateFeature(String),

    /// NaN or infinite measurement passed for prediction.
    #[error("non-finite value for {feature}: {value}")]
    NonFiniteMeasurement { feature: &'static str, value: f64 },

    /// Invalid hyperparameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}
