//! Configuration profiles for the bulkload CLI
//!
//! Config file location: ~/.bulkload/config.toml
//!
//! Example config:
//! ```toml
//! [default]
//! endpoint = "http://127.0.0.1:8000"
//!
//! [staging]
//! endpoint = "https://imports.staging.example.com"
//! timeout = 600
//! output_dir = "/tmp/imports"
//! ```
//!
//! `BULKLOAD_*` environment variables override the selected profile.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bulkload_core::ClientConfig;

const DEFAULT_PROFILE: &str = "default";

/// Settings stored in one profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Import service base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connection timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,

    /// How long the final progress is held before the bar resets
    #[serde(default = "default_cooldown")]
    pub cooldown_ms: u64,

    /// Where downloaded result files are written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
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

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
            cooldown_ms: default_cooldown(),
            output_dir: None,
        }
    }
}

/// Configuration file with multiple profiles
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub profiles: BTreeMap<String, Config>,
}

impl ConfigFile {
    fn read(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

impl Config {
    /// Get config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let home = directories::BaseDirs::new()
            .context("Could not determine home directory")?
            .home_dir()
            .to_path_buf();

        Ok(home.join(".bulkload"))
    }

    /// Get config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load a profile from the user's config file
    pub fn load(profile: Option<&str>) -> Result<Self> {
        Self::load_from(&Self::config_path()?, profile)
    }

    /// Load a profile from `path`; a missing file or profile yields defaults
    pub fn load_from(path: &Path, profile: Option<&str>) -> Result<Self> {
        let profile_name = profile.unwrap_or(DEFAULT_PROFILE);
        let file = ConfigFile::read(path)?;
        Ok(file.profiles.get(profile_name).cloned().unwrap_or_default())
    }

    /// Save this profile to the user's config file
    pub fn save(&self, profile: Option<&str>) -> Result<()> {
        self.save_to(&Self::config_path()?, profile)
    }

    pub fn save_to(&self, path: &Path, profile: Option<&str>) -> Result<()> {
        let profile_name = profile.unwrap_or(DEFAULT_PROFILE);
        let mut file = ConfigFile::read(path)?;
        file.profiles.insert(profile_name.to_string(), self.clone());
        file.write(path)
    }

    /// List all profiles
    pub fn list_profiles() -> Result<Vec<String>> {
        Self::list_profiles_in(&Self::config_path()?)
    }

    pub fn list_profiles_in(path: &Path) -> Result<Vec<String>> {
        Ok(ConfigFile::read(path)?.profiles.into_keys().collect())
    }

    /// Delete a profile
    pub fn delete_profile(profile: &str) -> Result<()> {
        Self::delete_profile_in(&Self::config_path()?, profile)
    }

    pub fn delete_profile_in(path: &Path, profile: &str) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }

        let mut file = ConfigFile::read(path)?;
        file.profiles.remove(profile);
        file.write(path)
    }

    /// Resolve the client configuration, applying `BULKLOAD_*` overrides
    pub fn client_config(&self, file: Option<&str>) -> Result<ClientConfig> {
        let mut config = self.base_client_config(file)?;
        config.apply_env();
        Ok(config)
    }

    /// A `--config` file replaces the profile's settings entirely
    fn base_client_config(&self, file: Option<&str>) -> Result<ClientConfig> {
        match file {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("Failed to load client settings from {}", path)),
            None => Ok(self.to_client_config()),
        }
    }

    fn to_client_config(&self) -> ClientConfig {
        let mut config = ClientConfig {
            timeout_secs: self.timeout,
            connect_timeout_secs: self.connect_timeout,
            cooldown_ms: self.cooldown_ms,
            output_dir: self.output_dir.clone(),
            ..ClientConfig::default()
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        config
    }

    /// Get a config value by key name
    pub fn get_value(&self, key: &str) -> Option<String> {
        match key {
            "endpoint" => self.endpoint.clone(),
            "timeout" => Some(self.timeout.to_string()),
            "connect_timeout" => Some(self.connect_timeout.to_string()),
            "cooldown_ms" => Some(self.cooldown_ms.to_string()),
            "output_dir" => self.output_dir.as_ref().map(|p| p.display().to_string()),
            _ => None,
        }
    }

    /// Set a config value by key name
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "endpoint" => {
                let mut candidate = self.to_client_config();
                candidate.endpoint = value.to_string();
                candidate.validate()?;
                self.endpoint = Some(value.to_string());
            }
            "timeout" => self.timeout = parse_number(key, value)?,
            "connect_timeout" => self.connect_timeout = parse_number(key, value)?,
            "cooldown_ms" => self.cooldown_ms = parse_number(key, value)?,
            "output_dir" => self.output_dir = Some(PathBuf::from(value)),
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Get all config keys
    pub fn keys() -> &'static [&'static str] {
        &[
            "endpoint",
            "timeout",
            "connect_timeout",
            "cooldown_ms",
            "output_dir",
        ]
    }
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse()
        .with_context(|| format!("{} must be a whole number, got '{}'", key, value))
}
