//! Error types for Bulkload

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // Selection Errors
    #[error("Unsupported file type '{0}'. Please upload CSV or XLSX.")]
    UnsupportedFormat(String),

    #[error("Please select a CSV or Excel file")]
    NoFileSelected,

    // Parse Errors
    #[error("Failed to parse file: {0}")]
    Parse(String),

    // Network Errors
    #[error("{0}")]
    Transport(String),

    /// `status` is absent when no response arrived
    #[error("Download failed{}: {message}", status_suffix(.status))]
    Download {
        status: Option<u16>,
        message: String,
    },

    #[error("No result artifact is available for this import")]
    NoArtifact,

    // Configuration Errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    pub fn code(&self) -> &'static str {
        match self {
            Error::UnsupportedFormat(_) => "UnsupportedFormat",
            Error::NoFileSelected => "NoFileSelected",
            Error::Parse(_) => "ParseError",
            Error::Transport(_) => "TransportFailure",
            Error::Download { .. } | Error::NoArtifact => "DownloadFailure",
            Error::InvalidConfig(_) => "InvalidConfig",
            Error::Io(_) => "IoError",
            Error::Other(_) => "InternalError",
        }
    }

    /// Whether the error leaves the current session usable.
    ///
    /// Only transport failures end an import attempt; everything else is a
    /// notice the user can act on without losing the displayed summary.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Transport(_) | Error::Other(_))
    }
}

/// ` (404)` for a rejected request, nothing for a network failure
pub fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::NoFileSelected.code(), "NoFileSelected");
        assert_eq!(
            Error::UnsupportedFormat("pdf".into()).code(),
            "UnsupportedFormat"
        );
        assert_eq!(
            Error::Download {
                status: Some(404),
                message: "Result not found".into()
            }
            .code(),
            "DownloadFailure"
        );
    }

    #[test]
    fn test_transport_message_is_verbatim() {
        let err = Error::Transport("duplicate SKU".into());
        assert_eq!(err.to_string(), "duplicate SKU");
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_download_failure_is_recoverable() {
        let err = Error::Download {
            status: Some(500),
            message: "boom".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.to_string(), "Download failed (500): boom");
    }

    #[test]
    fn test_download_without_response_is_recoverable() {
        let err = Error::Download {
            status: None,
            message: "connection refused".into(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.code(), "DownloadFailure");
        assert_eq!(err.to_string(), "Download failed: connection refused");
    }
}
