//! Engine error types
//!
//! Degenerate inputs (empty groups, too few correlation columns) are not
//! errors; stages report them through `Option`, empty maps or
//! [`Correlation::InsufficientData`](crate::pipeline::Correlation).

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that abort the current computation chain
#[derive(Error, Debug)]
pub enum InsightsError {
    /// The dataset source could not be read
    #[error("Dataset unavailable from {source_name}: {reason}")]
    DataUnavailable { source_name: String, reason: String },

    /// An expected column is absent or has the wrong type
    #[error("Schema mismatch on column '{column}': {detail}")]
    SchemaMismatch { column: String, detail: String },

    /// A categorical code column holds a value outside {0, 1}
    #[error("Invalid code in column '{column}' at row {row}: {value}")]
    InvalidCode {
        column: String,
        row: usize,
        value: String,
    },

    /// A caller-supplied parameter is out of range
    #[error("Invalid parameter '{name}': {detail}")]
    InvalidParameter { name: &'static str, detail: String },

    #[error(transparent)]
    Frame(#[from] PolarsError),
}

impl InsightsError {
    pub(crate) fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::DataUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
