//! Config and data directory resolution.

use crate::error::ApiError;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "cortex-gate";

/// `$XDG_CONFIG_HOME/cortex-gate/config.toml`, else `~/.config/cortex-gate/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    let base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var("HOME").ok()?).join(".config"),
    };
    Some(base.join(APP_DIR_NAME).join("config.toml"))
}

/// Platform data directory for the store and journal.
pub fn default_data_dir() -> Result<PathBuf, ApiError> {
    ProjectDirs::from("dev", "cortex", APP_DIR_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            ApiError::ConfigError(
                "Could not determine a data directory (no home directory); set storage.data_dir"
                    .to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_path_ends_with_app_file() {
        if let Some(path) = global_config_path() {
            assert!(path.ends_with("cortex-gate/config.toml"));
        }
    }
}
