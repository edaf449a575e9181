//! Error types for the isoflux library.

use thiserror::Error;

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum FluxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown transformation '{name}'; valid options are: additive, centered, isometric")]
    UnknownTransformation { name: String },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Non-positive entry {value} at position {index}: log-ratio transforms require strictly positive compositions")]
    NonPositiveEntry { index: usize, value: f64 },

    #[error("Missing measurement for sample '{sample}', metabolite '{metabolite}', isotopologue '{isotopologue}'")]
    MissingValue {
        sample: String,
        metabolite: String,
        isotopologue: String,
    },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid isotopologue label '{0}': expected 'm<k>' (m0, m1, ...)")]
    InvalidIsotopologue(String),

    #[error("Empty data: {0}")]
    EmptyData(String),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, FluxError>;
