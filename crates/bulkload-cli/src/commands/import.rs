//! import command - upload a file and report the result

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use bulkload_client::{ImportFailure, ImportOutcome, ImportSession, Summary};
use bulkload_core::types::SourceFile;

use super::preview::print_table;
use super::{error_json, CommandContext};
use crate::progress::{format_duration, ImportProgress};

pub async fn execute(
    ctx: &CommandContext,
    path: &Path,
    output_dir: Option<PathBuf>,
    download: bool,
) -> Result<bool> {
    let mut session =
        ImportSession::new(&ctx.client_config).context("Failed to create import client")?;
    let file = SourceFile::new(path);

    match session.select_file(file.clone()).await {
        Ok(table) => {
            if !ctx.is_silent() {
                print_table(file.name(), table);
                println!();
            }
        }
        Err(e) => match bulkload_core::Error::from(e) {
            err @ bulkload_core::Error::UnsupportedFormat(_) => {
                ctx.report(&err, &err.to_string());
                return Ok(false);
            }
            // The service is the authority on the file's contents
            err => ctx.notice(&format!("Preview unavailable: {}", err)),
        },
    }

    let progress = if ctx.is_silent() {
        ImportProgress::hidden()
    } else {
        ImportProgress::new(file.name(), file.size().await.ok())
    };

    let started = Instant::now();
    let outcome = session.start_import(&progress).await?;
    progress.finish();
    let elapsed = started.elapsed();

    let result = match &outcome {
        ImportOutcome::Failed(failure) => {
            report_failure(ctx, failure);
            return Ok(false);
        }
        ImportOutcome::Success(result) | ImportOutcome::PartialSuccess(result) => result,
    };

    let summary = Summary::from_result(result);

    let mut download_error = None;
    let saved = if download && summary.download_available() {
        let dir = ctx.output_dir(output_dir);
        match session.download_artifact(&dir).await {
            Ok(path) => Some(path),
            Err(e) => {
                // The summary stays valid; only the file is missing
                let err = bulkload_core::Error::from(e);
                if !ctx.is_json() {
                    ctx.report(&err, &format!("Could not download the result file: {}", err));
                }
                download_error = Some(error_json(&err));
                None
            }
        }
    } else {
        None
    };

    if ctx.is_json() {
        let status = match outcome {
            ImportOutcome::PartialSuccess(_) => "partial_success",
            _ => "success",
        };
        let report = json!({
            "status": status,
            "summary": summary,
            "saved_to": saved.as_ref().map(|p| p.display().to_string()),
            "download_error": download_error,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(true);
    }

    if !ctx.quiet {
        println!(
            "{} Imported {} in {}",
            "✓".green(),
            file.name().blue(),
            format_duration(elapsed)
        );
        println!();
    }
    print_summary(&summary);

    match (&saved, &summary.download_id) {
        (Some(path), _) => println!(
            "{} Result file saved to {}",
            "✓".green(),
            path.display().to_string().blue()
        ),
        (None, Some(id)) if !download => ctx.info(&format!(
            "Download the result file with: {}",
            format!("bulkload download {}", id).cyan()
        )),
        _ => {}
    }

    Ok(true)
}

fn report_failure(ctx: &CommandContext, failure: &ImportFailure) {
    if ctx.is_json() {
        let code = bulkload_core::Error::Transport(failure.message.clone()).code();
        let report = json!({
            "status": "failed",
            "code": code,
            "message": failure.message,
            "http_status": failure.status,
            "progress": failure.reached.percent(),
        });
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(_) => ctx.error(&failure.message),
        }
        return;
    }

    ctx.error(&format!("Import failed: {}", failure.message));
}

/// Render a summary with the rejected rows first
pub fn print_summary(summary: &Summary) {
    if let Some(guidance) = summary.guidance() {
        println!("{}", "Validation Errors".yellow().bold());
        println!("{}", guidance.yellow());
        for group in &summary.row_errors {
            println!("  {}", group.label.bold());
            for message in &group.messages {
                println!("    {} {}", "-".red(), message);
            }
        }
        println!();
    }

    println!("{}", "Import Summary".bold());
    for (label, value) in summary.counters() {
        println!("  {}: {}", label.cyan(), value);
    }
    println!();
}
