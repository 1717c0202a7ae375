use std::path::PathBuf;

use thiserror::Error;

/// Fatal failure to read a data source or to make sense of its schema.
///
/// Individual malformed rows never produce this error; the loader drops them.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("data source is missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has unsupported type {found}")]
    InvalidColumnType { column: String, found: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("expected a top-level JSON array of records")]
    NotAnArray,
}

/// A summary statistic could not be computed from otherwise valid records.
#[derive(Debug, Error, PartialEq)]
pub enum SummaryError {
    #[error("mean elevation over {count} airports is not a finite number")]
    NonFiniteMean { count: usize },

    #[error("mean elevation of {state} over {count} airports is not a finite number")]
    NonFiniteStateMean { state: String, count: usize },
}
