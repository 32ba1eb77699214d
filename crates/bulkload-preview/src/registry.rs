//! Format dispatch

use std::collections::HashMap;
use std::sync::Arc;

use bulkload_core::types::{PreviewTable, SourceFile};
use tracing::{debug, warn};

use crate::delimited::CsvParser;
use crate::error::{PreviewError, PreviewResult};
use crate::spreadsheet::SpreadsheetParser;

/// A decoder that turns a complete file payload into a preview
pub trait PreviewParser: Send + Sync {
    /// Short format name used in logs
    fn name(&self) -> &'static str;

    /// Lower-case extensions (without the dot) this parser handles
    fn extensions(&self) -> &[&'static str];

    /// Decode `data` into a preview table
    fn parse(&self, data: &[u8]) -> PreviewResult<PreviewTable>;
}

/// Extension-keyed table of preview parsers
#[derive(Clone)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn PreviewParser>>,
}

impl ParserRegistry {
    /// Registry with no formats
    pub fn empty() -> Self {
        Self {
            parsers: HashMap::new(),
        }
    }

    /// Register a parser under every extension it declares, replacing any
    /// previous parser for the same extension
    pub fn register(&mut self, parser: impl PreviewParser + 'static) -> &mut Self {
        let parser: Arc<dyn PreviewParser> = Arc::new(parser);
        for ext in parser.extensions() {
            if let Some(previous) = self.parsers.insert(ext.to_lowercase(), parser.clone()) {
                debug!(extension = %ext, replaced = previous.name(), "Replaced preview parser");
            }
        }
        self
    }

    pub fn lookup(&self, extension: &str) -> Option<&Arc<dyn PreviewParser>> {
        self.parsers.get(&extension.to_lowercase())
    }

    pub fn supports(&self, extension: &str) -> bool {
        self.lookup(extension).is_some()
    }

    /// Registered extensions, sorted
    pub fn supported_extensions(&self) -> Vec<&str> {
        let mut exts: Vec<&str> = self.parsers.keys().map(String::as_str).collect();
        exts.sort_unstable();
        exts
    }

    /// Build the preview for `file`.
    ///
    /// The format is resolved before any I/O so an unsupported file fails
    /// without being read.
    pub async fn preview(&self, file: &SourceFile) -> PreviewResult<PreviewTable> {
        let extension = file.extension();
        let parser = match self.lookup(&extension) {
            Some(parser) => parser.clone(),
            None => {
                warn!(file = %file.name(), extension = %extension, "Unsupported preview format");
                return Err(PreviewError::UnsupportedFormat(extension));
            }
        };

        let data = file.read_bytes().await?;
        let table = parser.parse(&data)?;

        debug!(
            file = %file.name(),
            format = parser.name(),
            bytes = data.len(),
            headers = table.headers.len(),
            rows = table.rows.len(),
            "Built preview"
        );

        Ok(table)
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register(CsvParser::new())
            .register(SpreadsheetParser::xlsx())
            .register(SpreadsheetParser::xls());
        registry
    }
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserRegistry")
            .field("extensions", &self.supported_extensions())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulkload_core::types::CellValue;
    use std::io::Write;

    struct TsvParser;

    impl PreviewParser for TsvParser {
        fn name(&self) -> &'static str {
            "tsv"
        }

        fn extensions(&self) -> &[&'static str] {
            &["tsv", "tab"]
        }

        fn parse(&self, data: &[u8]) -> PreviewResult<PreviewTable> {
            let text = String::from_utf8_lossy(data);
            let mut lines = text.lines();
            let headers: Vec<String> = lines
                .next()
                .map(|l| l.split('\t').map(str::to_string).collect())
                .unwrap_or_default();
            let rows = lines.map(|line| {
                headers
                    .iter()
                    .cloned()
                    .zip(line.split('\t').map(CellValue::from))
                    .collect()
            });
            Ok(PreviewTable::new(headers.clone(), rows))
        }
    }

    #[test]
    fn test_default_formats() {
        let registry = ParserRegistry::default();
        assert_eq!(registry.supported_extensions(), vec!["csv", "xls", "xlsx"]);
        assert!(registry.supports("CSV"));
        assert!(!registry.supports("pdf"));
    }

    #[tokio::test]
    async fn test_unsupported_format_is_not_read() {
        let registry = ParserRegistry::default();
        let file = SourceFile::new("/nonexistent/catalog.pdf");

        let err = registry.preview(&file).await.unwrap_err();
        assert!(matches!(err, PreviewError::UnsupportedFormat(ref ext) if ext == "pdf"));
    }

    #[tokio::test]
    async fn test_registered_format_is_dispatched() {
        let mut registry = ParserRegistry::default();
        registry.register(TsvParser);

        let mut file = tempfile::Builder::new().suffix(".TSV").tempfile().unwrap();
        write!(file, "sku\ttitle\nA-1\tShirt\n").unwrap();

        let table = registry.preview(&SourceFile::new(file.path())).await.unwrap();
        assert_eq!(table.headers, vec!["sku", "title"]);
        assert_eq!(table.cell(0, "title"), Some(&CellValue::from("Shirt")));
    }

    #[tokio::test]
    async fn test_uppercase_csv_extension() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        write!(file, "Handle,Title\nshirt,Shirt\n").unwrap();

        let table = crate::preview(&SourceFile::new(file.path())).await.unwrap();
        assert_eq!(table.headers, vec!["Handle", "Title"]);
        assert_eq!(table.rows.len(), 1);
    }
}
