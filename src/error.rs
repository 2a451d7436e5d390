use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while reading the launch table at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow batch: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("unexpected layout: {0}")]
    Layout(String),

    #[error("missing required column '{column}'")]
    MissingColumn { column: String },

    /// `row` counts data rows from 1, header excluded.
    #[error("data row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
}

impl LoadError {
    pub(crate) fn missing(column: &str) -> Self {
        LoadError::MissingColumn {
            column: column.to_string(),
        }
    }

    pub(crate) fn invalid(row: usize, column: &str, value: impl ToString) -> Self {
        LoadError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.to_string(),
        }
    }
}
