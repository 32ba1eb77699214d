//! CLI command implementations
//!
//! Every command returns `Ok(false)` when it reported a failure the user
//! should see as a non-zero exit, and `Err` only for unexpected errors.

pub mod configure;
pub mod download;
pub mod health;
pub mod import;
pub mod preview;

use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;

use bulkload_core::ClientConfig;

use crate::config::Config;
use crate::OutputFormat;

/// Context passed to all commands
pub struct CommandContext {
    pub config: Config,
    pub client_config: ClientConfig,
    pub profile: Option<String>,
    pub output_format: OutputFormat,
    pub quiet: bool,
}

impl CommandContext {
    /// Check if output should be JSON
    pub fn is_json(&self) -> bool {
        matches!(self.output_format, OutputFormat::Json)
    }

    /// Progress and decorations are suppressed
    pub fn is_silent(&self) -> bool {
        self.quiet || self.is_json()
    }

    /// Print info message if not quiet
    pub fn info(&self, msg: &str) {
        if !self.is_silent() {
            println!("{}", msg);
        }
    }

    /// Print a notice the user can act on
    pub fn notice(&self, msg: &str) {
        eprintln!("{} {}", "!".yellow().bold(), msg);
    }

    /// Print error message
    pub fn error(&self, msg: &str) {
        eprintln!("{} {}", "✗".red().bold(), msg);
    }

    /// Report a failed operation. Recoverable errors print as notices;
    /// JSON output carries the stable error code.
    pub fn report(&self, err: &bulkload_core::Error, msg: &str) {
        if self.is_json() {
            println!("{:#}", error_json(err));
        } else if err.is_recoverable() {
            self.notice(msg);
        } else {
            self.error(msg);
        }
    }

    /// Output directory for result files: flag, then profile, then cwd
    pub fn output_dir(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.unwrap_or_else(|| self.client_config.output_dir())
    }
}

pub fn error_json(err: &bulkload_core::Error) -> serde_json::Value {
    json!({
        "status": "error",
        "code": err.code(),
        "message": err.to_string(),
        "recoverable": err.is_recoverable(),
    })
}
