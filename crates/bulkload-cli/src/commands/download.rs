//! download command - fetch the result file of an import

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

use bulkload_client::ImportClient;

use super::CommandContext;
use crate::progress::{create_spinner, format_bytes};

#[derive(Serialize)]
struct DownloadResult {
    download_id: String,
    path: String,
    size: u64,
}

pub async fn execute(ctx: &CommandContext, id: &str, output_dir: Option<PathBuf>) -> Result<bool> {
    let client = ImportClient::new(&ctx.client_config).context("Failed to create import client")?;
    let dir = ctx.output_dir(output_dir);

    let spinner = create_spinner(&format!("Downloading result {}", id), ctx.is_silent());
    let saved = client.save_artifact(id, &dir).await;
    spinner.finish_and_clear();

    let path = match saved {
        Ok(path) => path,
        Err(e) => {
            let err = bulkload_core::Error::from(e);
            ctx.report(&err, &err.to_string());
            return Ok(false);
        }
    };

    let size = tokio::fs::metadata(&path).await.map(|m| m.len()).unwrap_or(0);

    if ctx.is_json() {
        let result = DownloadResult {
            download_id: id.to_string(),
            path: path.display().to_string(),
            size,
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "{} Saved {} ({})",
            "✓".green(),
            path.display().to_string().blue(),
            format_bytes(size)
        );
    }

    Ok(true)
}
