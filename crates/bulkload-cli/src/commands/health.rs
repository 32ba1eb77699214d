//! health command - check the import service

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::json;

use bulkload_client::ImportClient;

use super::CommandContext;

pub async fn execute(ctx: &CommandContext) -> Result<bool> {
    let client = ImportClient::new(&ctx.client_config).context("Failed to create import client")?;

    let (healthy, detail) = match client.health().await {
        Ok(status) => (status.is_ok(), status.status),
        Err(e) => (false, e.to_string()),
    };

    if ctx.is_json() {
        let report = json!({
            "endpoint": client.base_url(),
            "healthy": healthy,
            "status": detail,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if healthy {
        println!("{} {} is {}", "✓".green(), client.base_url().blue(), detail.green());
    } else {
        ctx.error(&format!("{} is unavailable: {}", client.base_url(), detail));
    }

    Ok(healthy)
}
