//! Import client error types

use bulkload_core::error::status_suffix;
use thiserror::Error;

/// Result type for client operations
pub type ClientResult<T> = Result<T, ImportError>;

/// Errors that abort an operation before or outside an import attempt.
///
/// A rejected import is not one of these: it settles the attempt as
/// [`ImportOutcome::Failed`](crate::ImportOutcome::Failed).
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Please select a CSV or Excel file")]
    NoFileSelected,

    #[error("No result artifact is available for this import")]
    NoArtifact,

    /// Covers rejected responses and requests that never got one
    #[error("Download failed{}: {message}", status_suffix(.status))]
    Download {
        status: Option<u16>,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] bulkload_core::Error),
}

impl From<ImportError> for bulkload_core::Error {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::NoFileSelected => bulkload_core::Error::NoFileSelected,
            ImportError::NoArtifact => bulkload_core::Error::NoArtifact,
            ImportError::Download { status, message } => {
                bulkload_core::Error::Download { status, message }
            }
            ImportError::Transport(message) => bulkload_core::Error::Transport(message),
            ImportError::Http(e) => bulkload_core::Error::Transport(e.to_string()),
            ImportError::Io(e) => bulkload_core::Error::Io(e),
            ImportError::Core(e) => e,
        }
    }
}
