//! Configuration loading from file system
//!
//! Reads a JSON config file. Any failure falls back to defaults.

use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use super::defaults::{APP_DIR_NAME, CONFIG_FILE_NAME};
use super::types::Config;

/// `<config dir>/polaris-stories/config.json`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from `path`, or from [`default_config_path`] when `None`.
///
/// Returns Config::default() if the file is missing or invalid.
#[instrument(name = "load_config")]
pub fn load_config(path: Option<&Path>) -> Config {
    let Some(config_path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
        info!("No config directory available, using defaults");
        return Config::default();
    };

    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Config::default();
    }

    let contents = match std::fs::read_to_string(&config_path) {
        Ok(contents) => contents,
        Err(e) => {
            warn!(error = %e, path = %config_path.display(), "Failed to read config, using defaults");
            return Config::default();
        }
    };

    match serde_json::from_str::<Config>(&contents) {
        Ok(config) => {
            info!(
                path = %config_path.display(),
                library = config.library.len(),
                decorators = config.decorators.len(),
                "Successfully loaded config"
            );
            config
        }
        Err(e) => {
            warn!(
                error = %e,
                path = %config_path.display(),
                "Failed to parse config JSON, using defaults"
            );
            Config::default()
        }
    }
}
