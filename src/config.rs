/// User settings, stored as `settings.toml` in the platform config directory:
/// - Linux: ~/.config/sample-rater/settings.toml
/// - macOS: ~/Library/Application Support/sample-rater/settings.toml
/// - Windows: %APPDATA%\sample-rater\settings.toml
///
/// Command-line flags override whatever the file says.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::AppError;
use crate::state::session::DEFAULT_SAMPLE_COUNT;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "sample-rater";

pub const DEFAULT_CODER: &str = "hossam";
pub const DEFAULT_SERVICE_URL: &str = "https://cgt-coder-app.herokuapp.com";
pub const DEFAULT_ASSET_ROOT: &str = "assets/img/evals";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rater identifier sent with every request
    pub coder: String,
    /// Root URL of the scoring service
    pub service_url: String,
    /// Directory holding `<folder>/coders/{A,B,C}.png`
    pub asset_root: PathBuf,
    /// Highest valid sample number
    pub sample_count: u32,
    /// Upper bound on one round trip, so a hung request cannot keep the session busy
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            coder: DEFAULT_CODER.to_string(),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            asset_root: PathBuf::from(DEFAULT_ASSET_ROOT),
            sample_count: DEFAULT_SAMPLE_COUNT,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Values given on the command line; `None` keeps the file's value
#[derive(Debug, Default)]
pub struct Overrides {
    pub coder: Option<String>,
    pub service_url: Option<String>,
    pub asset_root: Option<PathBuf>,
}

impl Config {
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(coder) = overrides.coder {
            self.coder = coder;
        }
        if let Some(url) = overrides.service_url {
            self.service_url = url;
        }
        if let Some(root) = overrides.asset_root {
            self.asset_root = root;
        }
        self
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

/// Load from the default location, falling back to defaults when absent
pub fn load() -> Result<Config, AppError> {
    match default_config_path() {
        Some(path) if path.exists() => load_from_path(&path),
        _ => Ok(Config::default()),
    }
}

/// Load from `path`. A file that does not parse yields the defaults.
pub fn load_from_path(path: &Path) -> Result<Config, AppError> {
    let content = fs::read_to_string(path)?;
    match toml::from_str(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            warn!("⚠️  Ignoring unreadable settings at {}: {}", path.display(), e);
            Ok(Config::default())
        }
    }
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_round_trip() {
        let config = Config {
            coder: "rater-2".to_string(),
            service_url: "http://localhost:5000".to_string(),
            asset_root: PathBuf::from("/srv/evals"),
            sample_count: 40,
            request_timeout_secs: 5,
        };
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("settings.toml");

        save_to_path(&config, &path).unwrap();
        let loaded = load_from_path(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "coder = \"someone\"\n").unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.coder, "someone");
        assert_eq!(loaded.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(loaded.sample_count, DEFAULT_SAMPLE_COUNT);
        assert_eq!(loaded.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_invalid_toml_falls_back_to_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "not = valid = toml").unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let temp_dir = tempdir().unwrap();
        let result = load_from_path(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = Config::default().with_overrides(Overrides {
            coder: Some("guest".to_string()),
            service_url: None,
            asset_root: Some(PathBuf::from("/tmp/evals")),
        });

        assert_eq!(config.coder, "guest");
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.asset_root, PathBuf::from("/tmp/evals"));
    }
}
