//! Configuration and file paths for unidux-counter
//!
//! This crate provides:
//! - Platform directories for config and log files
//! - Configuration file discovery (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{config_file_candidates, load_config_file, ConfigFile};
pub use paths::{app_config_path, cache_dir, config_dir, log_file_path};
