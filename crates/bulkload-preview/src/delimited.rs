//! CSV preview

use bulkload_core::types::{CellValue, PreviewRow, PreviewTable};
use bulkload_core::PREVIEW_ROW_LIMIT;
use csv::ByteRecord;

use crate::error::PreviewResult;
use crate::headers::HeaderNames;
use crate::registry::PreviewParser;

/// Comma-separated values with a header row
#[derive(Debug, Clone)]
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewParser for CsvParser {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn extensions(&self) -> &[&'static str] {
        &["csv"]
    }

    fn parse(&self, data: &[u8]) -> PreviewResult<PreviewTable> {
        let data = data.strip_prefix("\u{FEFF}".as_bytes()).unwrap_or(data);

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(self.delimiter)
            .from_reader(data);

        // Legacy code page exports (Excel "Save as CSV") decode with U+FFFD instead of failing
        let raw: Vec<String> = reader.byte_headers()?.iter().map(decode).collect();
        let headers: HeaderNames = raw.iter().map(String::as_str).collect();
        if headers.len() == 0 {
            return Ok(PreviewTable::empty());
        }

        let mut rows = Vec::with_capacity(PREVIEW_ROW_LIMIT);
        for record in reader.byte_records() {
            let record = record?;
            if is_blank(&record) {
                continue;
            }

            rows.push(to_row(&headers, &record));
            if rows.len() == PREVIEW_ROW_LIMIT {
                break;
            }
        }

        Ok(PreviewTable::new(headers.into_vec(), rows))
    }
}

fn decode(field: &[u8]) -> String {
    String::from_utf8_lossy(field).into_owned()
}

/// A line with no content at all; `a,,` or `,` still count as data
fn is_blank(record: &ByteRecord) -> bool {
    record.is_empty() || (record.len() == 1 && record[0].is_empty())
}

/// Fields past the header are dropped; missing trailing fields stay absent
fn to_row(headers: &HeaderNames, record: &ByteRecord) -> PreviewRow {
    record
        .iter()
        .enumerate()
        .filter_map(|(i, field)| {
            headers
                .get(i)
                .map(|h| (h.to_string(), CellValue::from(decode(field))))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> PreviewTable {
        CsvParser::new().parse(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_headers_in_source_order() {
        let table = parse("Title,Handle,Variant SKU\nShirt,shirt,SH-1\n");
        assert_eq!(table.headers, vec!["Title", "Handle", "Variant SKU"]);
        assert_eq!(table.cell(0, "Variant SKU"), Some(&CellValue::from("SH-1")));
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let table = parse("Handle,Title\n\nshirt,Shirt\n\n\r\n\nhat,Hat\n\n");
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.cell(0, "Handle"), Some(&CellValue::from("shirt")));
        assert_eq!(table.cell(1, "Handle"), Some(&CellValue::from("hat")));
        assert!(table
            .rows
            .iter()
            .all(|row| row.values().any(|cell| !cell.is_empty())));
    }

    #[test]
    fn test_only_five_rows_are_kept() {
        let mut input = String::from("Handle,Price\n");
        for i in 0..40 {
            input.push_str(&format!("p-{},{}.00\n", i, i));
        }

        let table = parse(&input);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.cell(4, "Handle"), Some(&CellValue::from("p-4")));
    }

    #[test]
    fn test_ragged_rows() {
        let table = parse("a,b,c\n1,2\n1,2,3,4\n");
        assert!(table.cell(0, "c").is_none());
        assert_eq!(table.rows[0].len(), 2);
        assert_eq!(table.rows[1].len(), 3);
        assert_eq!(table.row_values(0), vec!["1", "2", ""]);
    }

    #[test]
    fn test_quoted_fields_and_bom() {
        let table = parse("\u{FEFF}Title,Body\n\"Shirt, red\",\"line one\nline two\"\n");
        assert_eq!(table.headers, vec!["Title", "Body"]);
        assert_eq!(table.cell(0, "Title"), Some(&CellValue::from("Shirt, red")));
        assert_eq!(
            table.cell(0, "Body"),
            Some(&CellValue::from("line one\nline two"))
        );
    }

    #[test]
    fn test_duplicate_headers() {
        let table = parse("Option,Option,Option\nSize,Color,Material\n");
        assert_eq!(table.headers, vec!["Option", "Option_1", "Option_2"]);
        assert_eq!(table.cell(0, "Option_1"), Some(&CellValue::from("Color")));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse(""), PreviewTable::empty());
        assert_eq!(parse("\n\n"), PreviewTable::empty());
    }

    #[test]
    fn test_header_only() {
        let table = parse("Handle,Title\n");
        assert_eq!(table.headers, vec!["Handle", "Title"]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_semicolon_delimiter() {
        let table = CsvParser::with_delimiter(b';')
            .parse(b"Handle;Title\nshirt;Shirt\n")
            .unwrap();
        assert_eq!(table.cell(0, "Title"), Some(&CellValue::from("Shirt")));
    }

    #[test]
    fn test_latin1_fields_are_replaced_not_rejected() {
        let table = CsvParser::new()
            .parse(b"Handle,Title\nshirt,Caf\xe9\n")
            .unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.cell(0, "Handle"), Some(&CellValue::from("shirt")));
        let title = table.cell(0, "Title").unwrap().to_string();
        assert!(title.starts_with("Caf"));
        assert!(title.contains('\u{FFFD}'));
    }

    #[test]
    fn test_latin1_header_still_yields_rows() {
        let table = CsvParser::new()
            .parse(b"Handle,Pr\xe9cio\nshirt,10\n")
            .unwrap();
        assert_eq!(table.headers, vec!["Handle", "Pr\u{FFFD}cio"]);
        assert_eq!(table.cell(0, "Pr\u{FFFD}cio"), Some(&CellValue::from("10")));
    }
}
