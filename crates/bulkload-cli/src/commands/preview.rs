//! preview command - show the first rows of a file

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use bulkload_core::types::{PreviewTable, SourceFile};

use super::CommandContext;

/// Widest a preview column is allowed to grow
const MAX_COLUMN_WIDTH: usize = 24;

pub async fn execute(ctx: &CommandContext, path: &Path) -> Result<bool> {
    let file = SourceFile::new(path);

    let table = match bulkload_preview::preview(&file).await {
        Ok(table) => table,
        Err(e) => {
            let err = bulkload_core::Error::from(e);
            let msg = match err {
                bulkload_core::Error::UnsupportedFormat(_) => err.to_string(),
                _ => format!("Could not preview {}: {}", file.name(), err),
            };
            ctx.report(&err, &msg);
            return Ok(false);
        }
    };

    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(&table)?);
    } else {
        print_table(file.name(), &table);
    }

    Ok(true)
}

/// Render a preview as an aligned, coloured table
pub fn print_table(name: &str, table: &PreviewTable) {
    println!("{} {}", "Preview:".bold(), name.blue());

    if table.is_empty() {
        println!("  {}", "(no rows to preview)".dimmed());
        return;
    }

    let rows: Vec<Vec<String>> = (0..table.rows.len())
        .map(|i| table.row_values(i).into_iter().map(|v| clip(&v)).collect())
        .collect();
    let headers: Vec<String> = table.headers.iter().map(|h| clip(h)).collect();
    let widths = column_widths(&headers, &rows);

    let header_line: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{:<w$}", h, w = *w).cyan().bold().to_string())
        .collect();
    println!("  {}", header_line.join("  "));

    for row in &rows {
        let line: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<w$}", v, w = *w))
            .collect();
        println!("  {}", line.join("  "));
    }

    println!(
        "  {}",
        format!("showing {} row(s); the whole file is uploaded", rows.len()).dimmed()
    );
}

fn column_widths(headers: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|v| v.chars().count())
                .chain(std::iter::once(h.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect()
}

fn clip(value: &str) -> String {
    let single_line = value.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_COLUMN_WIDTH {
        single_line
    } else {
        let kept: String = single_line.chars().take(MAX_COLUMN_WIDTH - 1).collect();
        format!("{}…", kept)
    }
}
