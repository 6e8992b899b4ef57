//! Error types for the batch driver.

use thiserror::Error;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors reading the lead list or writing the report.
#[derive(Debug, Error)]
pub enum DriverError {
    /// CSV parse or write failure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The lead file lacks a required column.
    #[error("lead file has no '{0}' column")]
    MissingColumn(String),
}
