// src/infra/paths.rs — Config file location
//
// OPTISCOPE_HOME overrides the config directory for isolation.
// When unset, config lives under ~/.optiscope/.

use std::path::PathBuf;

fn optiscope_home() -> Option<PathBuf> {
    std::env::var_os("OPTISCOPE_HOME").map(PathBuf::from)
}

/// Configuration directory: $OPTISCOPE_HOME/ or ~/.optiscope/
pub fn config_dir() -> Option<PathBuf> {
    if let Some(home) = optiscope_home() {
        return Some(home);
    }
    directories::BaseDirs::new().map(|b| b.home_dir().join(".optiscope"))
}

pub fn config_file_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}
