//! Bulkload Core Library
//!
//! Data model, error taxonomy and configuration shared by the preview parser,
//! the import client and the command-line front end.

pub mod config;
pub mod error;
pub mod types;

pub use config::ClientConfig;
pub use error::{Error, Result};

/// Bulkload version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default import service endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8000";

/// Bulk import route
pub const IMPORT_PATH: &str = "/import/products";

/// Result artifact route prefix; the download id is appended as the last segment
pub const RESULT_PATH: &str = "/import/products/result";

/// Health check route
pub const HEALTH_PATH: &str = "/health";

/// Multipart field the import service reads the file from
pub const UPLOAD_FIELD: &str = "file";

/// File name the downloaded result artifact is saved under
pub const RESULT_FILENAME: &str = "import_results.xlsx";

/// Maximum number of data rows kept in a preview
pub const PREVIEW_ROW_LIMIT: usize = 5;

/// Failure message used when the service rejects an import without a body
pub const DEFAULT_FAILURE_MESSAGE: &str = "Import failed";
