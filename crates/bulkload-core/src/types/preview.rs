//! Preview types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::PREVIEW_ROW_LIMIT;

/// A single preview cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn empty() -> Self {
        CellValue::Text(String::new())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.is_empty())
    }
}

impl Default for CellValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

/// One preview record, keyed by header name
pub type PreviewRow = HashMap<String, CellValue>;

/// Bounded tabular preview of a source file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreviewTable {
    pub headers: Vec<String>,
    pub rows: Vec<PreviewRow>,
}

impl PreviewTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a preview, keeping at most [`PREVIEW_ROW_LIMIT`] rows and
    /// dropping any cell whose key is not one of `headers`.
    pub fn new(headers: Vec<String>, rows: impl IntoIterator<Item = PreviewRow>) -> Self {
        let rows = rows
            .into_iter()
            .take(PREVIEW_ROW_LIMIT)
            .map(|mut row| {
                row.retain(|key, _| headers.contains(key));
                row
            })
            .collect();

        Self { headers, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell lookup; a missing cell is `None`, never an error
    pub fn cell(&self, row: usize, header: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(header))
    }

    /// Row values in header order, missing cells rendered empty
    pub fn row_values(&self, row: usize) -> Vec<String> {
        self.headers
            .iter()
            .map(|h| self.cell(row, h).map(|c| c.to_string()).unwrap_or_default())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[(&str, &str)]) -> PreviewRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_rows_are_capped() {
        let headers = vec!["Handle".to_string()];
        let rows = (0..12).map(|i| row(&[("Handle", &format!("p-{}", i))]));
        let table = PreviewTable::new(headers, rows);
        assert_eq!(table.rows.len(), PREVIEW_ROW_LIMIT);
        assert_eq!(table.cell(4, "Handle"), Some(&CellValue::from("p-4")));
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let headers = vec!["Handle".to_string(), "Title".to_string()];
        let table = PreviewTable::new(headers, vec![row(&[("Handle", "a"), ("Extra", "x")])]);

        assert!(table.cell(0, "Extra").is_none());
        assert!(table.cell(0, "Title").is_none());
        assert_eq!(table.row_values(0), vec!["a".to_string(), String::new()]);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(CellValue::Int(3).to_string(), "3");
        assert_eq!(CellValue::Float(19.99).to_string(), "19.99");
        assert_eq!(CellValue::Bool(true).to_string(), "true");
        assert!(CellValue::default().is_empty());
    }

    #[test]
    fn test_untagged_serialization() {
        let json = serde_json::to_string(&vec![
            CellValue::Int(1),
            CellValue::from("x"),
            CellValue::Bool(false),
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"x",false]"#);
    }
}
