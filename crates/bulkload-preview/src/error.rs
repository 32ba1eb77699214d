//! Preview error types

use thiserror::Error;

/// Result type for preview operations
pub type PreviewResult<T> = Result<T, PreviewError>;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Unsupported file type '{0}'. Please upload CSV or XLSX.")]
    UnsupportedFormat(String),

    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid spreadsheet: {0}")]
    Spreadsheet(String),

    #[error(transparent)]
    Source(#[from] bulkload_core::Error),
}

impl From<PreviewError> for bulkload_core::Error {
    fn from(err: PreviewError) -> Self {
        match err {
            PreviewError::UnsupportedFormat(ext) => bulkload_core::Error::UnsupportedFormat(ext),
            PreviewError::Source(inner) => inner,
            other => bulkload_core::Error::Parse(other.to_string()),
        }
    }
}
