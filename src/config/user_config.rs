//! User-level configuration location
//!
//! `~/.config/blamerank/config.toml` uses the same format as the project
//! file and is only read when the repository has no config of its own.

use std::path::PathBuf;

/// Get the user config file path
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("blamerank").join("config.toml"))
}
