//! Application configuration
//!
//! Configuration loaded from .unidux.toml file.

use crate::ConfigFile;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application configuration loaded from .unidux.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Log level used when RUST_LOG is not set ("error" .. "trace")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Counter value at startup
    #[serde(default)]
    pub initial_count: i64,

    /// Amount added or removed per increment/decrement
    #[serde(default = "default_step")]
    pub step: i64,

    /// Simulated latency of the quote service in milliseconds
    #[serde(default = "default_fetch_latency_ms")]
    pub fetch_latency_ms: u64,

    /// Fail every n-th quote request (0 never fails)
    #[serde(default)]
    pub fail_every: u32,

    /// Quotes served by the simulated quote service
    #[serde(default = "default_quotes")]
    pub quotes: Vec<String>,
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_step() -> i64 {
    1
}

fn default_fetch_latency_ms() -> u64 {
    500
}

fn default_quotes() -> Vec<String> {
    vec![
        "State changes only through dispatch.".to_string(),
        "Reducers are pure.".to_string(),
        "One source of truth.".to_string(),
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            initial_count: 0,
            step: default_step(),
            fetch_latency_ms: default_fetch_latency_ms(),
            fail_every: 0,
            quotes: default_quotes(),
        }
    }
}

impl AppConfig {
    /// Load config from the first file found, or use defaults
    ///
    /// Returns an error when a config file exists but cannot be parsed, so
    /// the caller decides how to report it.
    pub fn load() -> Result<Self> {
        Self::from_file(crate::load_config_file())
    }

    pub fn from_file(file: Option<ConfigFile>) -> Result<Self> {
        match file {
            Some(file) => Self::from_toml(&file.content)
                .with_context(|| format!("Invalid config in {}", file.path.display())),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }
}
