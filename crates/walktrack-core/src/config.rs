//! Tracker configuration persistence.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use validator::Validate;

use walktrack_types::{ConfigError, TrackerConfig};

const CONFIG_DIR: &str = "walktrack";
const CONFIG_FILE: &str = "config.json";

/// Default config location: `<platform config dir>/walktrack/config.json`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
        .ok_or(ConfigError::NoConfigDir)
}

/// Load and validate the configuration.
///
/// A missing file yields the defaults.
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(TrackerConfig::new());
    }

    let content = fs::read_to_string(&path).map_err(|e| ConfigError::from_io_error(&path, &e))?;
    let config: TrackerConfig =
        serde_json::from_str(&content).map_err(|e| ConfigError::from_json_error(&e))?;
    config.validate()?;

    info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Validate and write the configuration as pretty JSON.
pub fn save_config(config: &TrackerConfig, path: &Path) -> Result<(), ConfigError> {
    config.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConfigError::from_io_error(parent, &e))?;
    }
    let content = serde_json::to_string_pretty(config).map_err(|e| ConfigError::from_json_error(&e))?;
    fs::write(path, content).map_err(|e| ConfigError::from_io_error(path, &e))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(config, TrackerConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);
        let config = TrackerConfig {
            server_url: "wss://walks.example.com/ws".to_string(),
            location_sync_interval_ms: 2_000,
            ..Default::default()
        };

        save_config(&config, &path).unwrap();
        assert_eq!(load_config(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_malformed_and_invalid_files_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse { .. })));

        fs::write(&path, r#"{"server_url":"ftp://nope"}"#).unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Invalid { .. })));
    }
}
