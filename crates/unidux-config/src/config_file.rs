use crate::paths::app_config_path;
use std::{env, path::PathBuf};

pub(crate) const CONFIG_FILE: &str = ".unidux.toml";

/// A config file that was found, with its content
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
}

/// Places searched for a config file, in order
///
/// 1. `.unidux.toml` in the current working directory
/// 2. `~/.unidux.toml`
/// 3. `config.toml` in the platform config directory
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![PathBuf::from(CONFIG_FILE)];
    candidates.extend(get_home_config_path());
    if let Ok(path) = app_config_path() {
        candidates.push(path);
    }
    candidates
}

/// Load the first config file found in [`config_file_candidates`]
pub fn load_config_file() -> Option<ConfigFile> {
    first_readable(&config_file_candidates())
}

fn first_readable(candidates: &[PathBuf]) -> Option<ConfigFile> {
    candidates.iter().find_map(|path| {
        std::fs::read_to_string(path)
            .ok()
            .map(|content| ConfigFile {
                path: path.clone(),
                content,
            })
    })
}

/// Returns ~/.unidux.toml if HOME environment variable is set.
fn get_home_config_path() -> Option<PathBuf> {
    env::var_os("HOME").map(|home| PathBuf::from(home).join(CONFIG_FILE))
}
