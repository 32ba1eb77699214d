//! Configuration for the Bulkload import client

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::DEFAULT_ENDPOINT;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the import service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// How long the final progress state stays visible before the indicator resets
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u64,

    /// Directory result artifacts are saved into (current directory when unset)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_cooldown() -> u64 {
    1000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            cooldown_ms: default_cooldown(),
            output_dir: None,
        }
    }
}

impl ClientConfig {
    /// Load settings from a TOML file; missing keys take their defaults
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to read config: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| crate::Error::InvalidConfig(format!("Failed to parse config: {}", e)))
    }

    /// Override fields from `BULKLOAD_*` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("BULKLOAD_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(timeout) = std::env::var("BULKLOAD_TIMEOUT") {
            match timeout.parse() {
                Ok(t) => self.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring invalid BULKLOAD_TIMEOUT"),
            }
        }
        if let Ok(cooldown) = std::env::var("BULKLOAD_COOLDOWN_MS") {
            match cooldown.parse() {
                Ok(c) => self.cooldown_ms = c,
                Err(_) => warn!(value = %cooldown, "Ignoring invalid BULKLOAD_COOLDOWN_MS"),
            }
        }
        if let Ok(dir) = std::env::var("BULKLOAD_OUTPUT_DIR") {
            self.output_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn validate(&self) -> crate::Result<()> {
        let url = url::Url::parse(&self.endpoint).map_err(|e| {
            crate::Error::InvalidConfig(format!("Invalid endpoint '{}': {}", self.endpoint, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(crate::Error::InvalidConfig(format!(
                "Endpoint must use http or https: {}",
                self.endpoint
            )));
        }

        if self.timeout_secs == 0 {
            return Err(crate::Error::InvalidConfig(
                "timeout_secs must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Endpoint with any trailing slash removed, ready for path concatenation
    pub fn base_url(&self) -> &str {
        self.endpoint.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
