//! Result presentation

use std::fmt;

use serde::Serialize;

use bulkload_core::types::ImportResult;

/// Shown above the row errors of a partially accepted import
pub const SKIPPED_ROWS_GUIDANCE: &str = "Some rows were skipped because they failed validation. \
Fix the errors below and re-upload the file.";

/// Rejected rows for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowErrorGroup {
    pub label: String,
    pub messages: Vec<String>,
}

/// Displayable import summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub products_created: u64,
    pub products_updated: u64,
    pub variants_created: u64,
    pub variants_updated: u64,
    pub row_errors: Vec<RowErrorGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_id: Option<String>,
}

impl Summary {
    pub fn from_result(result: &ImportResult) -> Self {
        let row_errors = result
            .row_errors()
            .iter()
            .map(|err| RowErrorGroup {
                label: err.label(),
                messages: err.messages().into_iter().map(str::to_string).collect(),
            })
            .collect();

        Self {
            products_created: result.products_created,
            products_updated: result.products_updated,
            variants_created: result.variants_created,
            variants_updated: result.variants_updated,
            row_errors,
            download_id: result.download_id().map(str::to_string),
        }
    }

    /// Counter rows, always all four and in display order
    pub fn counters(&self) -> [(&'static str, u64); 4] {
        [
            ("Products Created", self.products_created),
            ("Products Updated", self.products_updated),
            ("Variants Created", self.variants_created),
            ("Variants Updated", self.variants_updated),
        ]
    }

    /// Guidance line for rejected rows, when there are any
    pub fn guidance(&self) -> Option<&'static str> {
        if self.row_errors.is_empty() {
            None
        } else {
            Some(SKIPPED_ROWS_GUIDANCE)
        }
    }

    pub fn download_available(&self) -> bool {
        self.download_id.is_some()
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(guidance) = self.guidance() {
            writeln!(f, "Validation Errors")?;
            writeln!(f, "{}", guidance)?;
            for group in &self.row_errors {
                writeln!(f, "  {}", group.label)?;
                for message in &group.messages {
                    writeln!(f, "    - {}", message)?;
                }
            }
            writeln!(f)?;
        }

        writeln!(f, "Import Summary")?;
        for (label, value) in self.counters() {
            writeln!(f, "  {}: {}", label, value)?;
        }

        if let Some(id) = &self.download_id {
            writeln!(f)?;
            writeln!(f, "Import result available (download id: {})", id)?;
        }

        Ok(())
    }
}
