//! Configuration and data directory paths
//!
//! Uses XDG directories via `dirs` crate.
//!
//! Platform-specific locations:
//! - Linux: `~/.config/unidux/`, `~/.cache/unidux/`
//! - macOS: `~/Library/Application Support/unidux/`, `~/Library/Caches/unidux/`
//! - Windows: `%APPDATA%\unidux\`, `%LOCALAPPDATA%\unidux\`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_NAME: &str = "unidux";

/// Get the application config directory, creating it if needed
pub fn config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Path of the config file in the platform config directory
pub fn app_config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Get the application cache directory, creating it if needed
pub fn cache_dir() -> Result<PathBuf> {
    let base = dirs::cache_dir().context("Could not determine cache directory")?;
    let dir = base.join(APP_NAME);
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    Ok(dir)
}

/// Path of a log file named after `timestamp`
///
/// Debug builds log into the current directory, release builds into the
/// cache directory (falling back to the current directory).
pub fn log_file_path(timestamp: &str) -> PathBuf {
    let filename = format!("unidux-{}.log", timestamp);

    if cfg!(debug_assertions) {
        PathBuf::from(filename)
    } else {
        cache_dir()
            .map(|dir| dir.join(&filename))
            .unwrap_or_else(|_| PathBuf::from(filename))
    }
}
