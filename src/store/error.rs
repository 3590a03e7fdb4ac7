use chrono::NaiveDate;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read record file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    // Errors during CSV reading (inside blocking task)
    #[error("Parsing error processing CSV data for series '{series}'")]
    CsvReadPolars {
        series: String,
        #[source]
        source: PolarsError,
    },

    #[error("Required column '{0}' not found in record data")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Column '{column}' could not be read as numbers")]
    ColumnType {
        column: String,
        #[source]
        source: PolarsError,
    },

    #[error("Invalid date '{value}' in row {row}")]
    InvalidDate { row: usize, value: String },

    #[error("Missing date in row {0}")]
    MissingDate(usize),

    #[error("Duplicate record for date {0}")]
    DuplicateDate(NaiveDate),

    #[error("Duplicate series id '{0}'")]
    DuplicateSeries(String),

    #[error("Invalid location for series '{id}': ({lat}, {lon})")]
    InvalidLocation { id: String, lat: f64, lon: f64 },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
