//! Bulkload Preview
//!
//! Detects the format of a selected file and materializes a bounded preview
//! (headers plus the first few rows) without touching the network.
//!
//! Formats are looked up in a [`ParserRegistry`] keyed by file extension, so
//! supporting a new format means registering another [`PreviewParser`].

mod delimited;
mod error;
mod headers;
mod registry;
mod spreadsheet;

#[cfg(test)]
pub(crate) mod fixtures;

pub use delimited::CsvParser;
pub use error::{PreviewError, PreviewResult};
pub use registry::{ParserRegistry, PreviewParser};
pub use spreadsheet::SpreadsheetParser;

use bulkload_core::types::{PreviewTable, SourceFile};

/// Preview a file with the default set of parsers
pub async fn preview(file: &SourceFile) -> PreviewResult<PreviewTable> {
    ParserRegistry::default().preview(file).await
}
