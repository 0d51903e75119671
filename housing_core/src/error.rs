//! Error types for the housing pipeline.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HousingError {
    /// Input row could not be turned into a record. Fatal for the run.
    #[error("failed to load line {line}, column {column}: {message}")]
    Load {
        line: u64,
        column: String,
        message: String,
    },

    /// A single PropertyAddress could not be decomposed. The row is kept.
    #[error("malformed address: {0:?}")]
    MalformedAddress(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parquet export failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HousingError {
    pub fn load(line: u64, column: &str, message: impl Into<String>) -> Self {
        HousingError::Load {
            line,
            column: column.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T, E = HousingError> = std::result::Result<T, E>;
