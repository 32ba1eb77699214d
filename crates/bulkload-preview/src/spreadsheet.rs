//! Spreadsheet preview (XLSX / XLS) via calamine

use std::fmt::Display;
use std::io::{Cursor, Read, Seek};

use bulkload_core::types::{CellValue, PreviewRow, PreviewTable};
use bulkload_core::PREVIEW_ROW_LIMIT;
use calamine::{Data, Range, Reader, Xls, Xlsx};
use tracing::debug;

use crate::error::{PreviewError, PreviewResult};
use crate::headers::HeaderNames;
use crate::registry::PreviewParser;

/// Workbook container format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpreadsheetKind {
    /// Office Open XML workbook
    Xlsx,
    /// Legacy BIFF workbook
    Xls,
}

/// Reads the first worksheet of a workbook.
///
/// The sheet is chosen by position, never by name. The first row of the
/// sheet's used range holds the column names; every data row gets every
/// column, with `""` for absent cells.
#[derive(Debug, Clone)]
pub struct SpreadsheetParser {
    kind: SpreadsheetKind,
}

impl SpreadsheetParser {
    pub fn xlsx() -> Self {
        Self {
            kind: SpreadsheetKind::Xlsx,
        }
    }

    pub fn xls() -> Self {
        Self {
            kind: SpreadsheetKind::Xls,
        }
    }
}

impl PreviewParser for SpreadsheetParser {
    fn name(&self) -> &'static str {
        match self.kind {
            SpreadsheetKind::Xlsx => "xlsx",
            SpreadsheetKind::Xls => "xls",
        }
    }

    fn extensions(&self) -> &[&'static str] {
        match self.kind {
            SpreadsheetKind::Xlsx => &["xlsx"],
            SpreadsheetKind::Xls => &["xls"],
        }
    }

    fn parse(&self, data: &[u8]) -> PreviewResult<PreviewTable> {
        if data.is_empty() {
            return Ok(PreviewTable::empty());
        }

        let cursor = Cursor::new(data);
        let range = match self.kind {
            SpreadsheetKind::Xlsx => first_sheet::<_, Xlsx<_>>(cursor)?,
            SpreadsheetKind::Xls => first_sheet::<_, Xls<_>>(cursor)?,
        };

        match range {
            Some(range) => Ok(range_to_table(&range)),
            None => Ok(PreviewTable::empty()),
        }
    }
}

fn first_sheet<RS, R>(reader: RS) -> PreviewResult<Option<Range<Data>>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let mut workbook = R::new(reader).map_err(|e| PreviewError::Spreadsheet(e.to_string()))?;

    match workbook.worksheet_range_at(0) {
        Some(range) => range
            .map(Some)
            .map_err(|e| PreviewError::Spreadsheet(e.to_string())),
        None => {
            debug!("Workbook has no worksheets");
            Ok(None)
        }
    }
}

fn range_to_table(range: &Range<Data>) -> PreviewTable {
    let mut rows = range.rows();

    let header_row = match rows.next() {
        Some(row) => row,
        None => return PreviewTable::empty(),
    };

    let mut headers = HeaderNames::with_empty_placeholder();
    for cell in header_row {
        headers.push(&header_text(cell));
    }

    let records: Vec<PreviewRow> = rows
        .filter(|row| row.iter().any(|cell| !matches!(cell, Data::Empty)))
        .take(PREVIEW_ROW_LIMIT)
        .map(|row| {
            (0..headers.len())
                .filter_map(|i| {
                    let value = row.get(i).map(to_cell).unwrap_or_default();
                    headers.get(i).map(|h| (h.to_string(), value))
                })
                .collect()
        })
        .collect();

    // Column names come from the first decoded record, so a sheet without
    // data rows previews as empty even when it has a header row.
    let headers = match records.first() {
        Some(_) => headers.into_vec(),
        None => return PreviewTable::empty(),
    };

    PreviewTable::new(headers, records)
}

fn header_text(cell: &Data) -> String {
    to_cell(cell).to_string()
}

fn to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::empty(),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Whole numbers read back as integers, matching how they were typed
fn number(value: f64) -> CellValue {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{Cell, WorkbookBuilder};

    #[test]
    fn test_first_sheet_by_position() {
        let data = WorkbookBuilder::new()
            .sheet(
                "Zeta",
                vec![
                    vec![Cell::text("Handle"), Cell::text("Title")],
                    vec![Cell::text("shirt"), Cell::text("Shirt")],
                ],
            )
            .sheet(
                "Alpha",
                vec![
                    vec![Cell::text("Ignored")],
                    vec![Cell::text("never read")],
                ],
            )
            .build();

        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();
        assert_eq!(table.headers, vec!["Handle", "Title"]);
        assert_eq!(table.cell(0, "Title"), Some(&CellValue::from("Shirt")));
        assert!(table.cell(0, "Ignored").is_none());
    }

    #[test]
    fn test_absent_cells_default_to_empty() {
        let data = WorkbookBuilder::new()
            .sheet(
                "Products",
                vec![
                    vec![Cell::text("Handle"), Cell::text("Title"), Cell::text("Price")],
                    vec![Cell::text("shirt"), Cell::Empty, Cell::number(19.99)],
                    vec![Cell::text("hat")],
                ],
            )
            .build();

        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();
        assert_eq!(table.rows.len(), 2);
        for row in &table.rows {
            assert_eq!(row.len(), 3);
        }
        assert_eq!(table.cell(0, "Title"), Some(&CellValue::empty()));
        assert_eq!(table.cell(0, "Price"), Some(&CellValue::Float(19.99)));
        assert_eq!(table.cell(1, "Price"), Some(&CellValue::empty()));
    }

    #[test]
    fn test_numbers_and_booleans() {
        let data = WorkbookBuilder::new()
            .sheet(
                "Sheet1",
                vec![
                    vec![Cell::text("Qty"), Cell::text("Published")],
                    vec![Cell::number(3.0), Cell::Bool(true)],
                ],
            )
            .build();

        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();
        assert_eq!(table.cell(0, "Qty"), Some(&CellValue::Int(3)));
        assert_eq!(table.cell(0, "Published"), Some(&CellValue::Bool(true)));
    }

    #[test]
    fn test_truncates_to_five_and_skips_blank_rows() {
        let mut rows = vec![vec![Cell::text("Handle")]];
        for i in 0..9 {
            rows.push(vec![Cell::text(&format!("p-{}", i))]);
            rows.push(vec![Cell::Empty]);
        }

        let data = WorkbookBuilder::new().sheet("Sheet1", rows).build();
        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();

        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.cell(1, "Handle"), Some(&CellValue::from("p-1")));
    }

    #[test]
    fn test_blank_header_cells() {
        let data = WorkbookBuilder::new()
            .sheet(
                "Sheet1",
                vec![
                    vec![Cell::text("Handle"), Cell::Empty, Cell::text("Handle")],
                    vec![Cell::text("a"), Cell::text("b"), Cell::text("c")],
                ],
            )
            .build();

        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();
        assert_eq!(table.headers, vec!["Handle", "__EMPTY", "Handle_1"]);
        assert_eq!(table.cell(0, "Handle_1"), Some(&CellValue::from("c")));
    }

    #[test]
    fn test_empty_sheet() {
        let data = WorkbookBuilder::new().sheet("Empty", vec![]).build();
        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }

    #[test]
    fn test_header_only_sheet() {
        let data = WorkbookBuilder::new()
            .sheet("Sheet1", vec![vec![Cell::text("Handle"), Cell::text("Title")]])
            .build();

        let table = SpreadsheetParser::xlsx().parse(&data).unwrap();
        assert_eq!(table, PreviewTable::empty());
    }

    #[test]
    fn test_empty_payload() {
        assert_eq!(
            SpreadsheetParser::xlsx().parse(&[]).unwrap(),
            PreviewTable::empty()
        );
    }

    #[test]
    fn test_garbage_payload() {
        let err = SpreadsheetParser::xlsx()
            .parse(b"Handle,Title\nshirt,Shirt\n")
            .unwrap_err();
        assert!(matches!(err, PreviewError::Spreadsheet(_)));
    }

    #[test]
    fn test_garbage_xls_payload() {
        let parser = SpreadsheetParser::xls();
        assert_eq!(parser.name(), "xls");

        let err = parser.parse(b"Handle,Title\nshirt,Shirt\n").unwrap_err();
        assert!(matches!(err, PreviewError::Spreadsheet(_)));
    }
}
