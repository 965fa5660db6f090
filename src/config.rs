//! Engine configuration.
//!
//! Settings live in a JSON file under the user config directory
//! (`~/.config/triptych/config.json` on Linux). Environment variables
//! override file values when a config is loaded through [`Config::load`].

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TriptychError};

/// Directory name under the user config directory.
const APP_DIR: &str = "triptych";

/// Config file name.
const CONFIG_FILE: &str = "config.json";

/// Persistent engine settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API key for the generation provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the remote project store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_url: Option<String>,

    /// Key for the remote project store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_key: Option<String>,

    /// Debounce window for preview renders, in milliseconds. Zero renders
    /// on every edit.
    #[serde(default)]
    pub debounce_ms: u64,

    /// Directory for crash-recovery snapshots. Defaults to a `snapshots`
    /// directory next to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot_dir: Option<PathBuf>,
}

impl Config {
    /// Default location of the config file, if a user config directory
    /// exists on this platform.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads the config from the default location and applies environment
    /// overrides. A missing file yields the defaults.
    pub fn load() -> Result<Config> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Config::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads the config from an explicit path, without environment
    /// overrides. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path).map_err(|e| TriptychError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Writes the config to the default location.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::default_path().ok_or_else(|| {
            TriptychError::Internal("no user config directory on this platform".to_string())
        })?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Writes the config to an explicit path, creating parent directories
    /// as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| TriptychError::DirectoryCreateError {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| TriptychError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Config written to {}", path.display());
        Ok(())
    }

    /// Applies `TRIPTYCH_*` environment variables over file values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = env::var("TRIPTYCH_GEMINI_API_KEY") {
            if !key.trim().is_empty() {
                self.api_key = Some(key);
            }
        }
        if let Ok(url) = env::var("TRIPTYCH_STORE_URL") {
            if !url.trim().is_empty() {
                self.store_url = Some(url);
            }
        }
        if let Ok(key) = env::var("TRIPTYCH_STORE_KEY") {
            if !key.trim().is_empty() {
                self.store_key = Some(key);
            }
        }
        if let Ok(ms) = env::var("TRIPTYCH_DEBOUNCE_MS") {
            if let Ok(ms) = ms.parse() {
                self.debounce_ms = ms;
            }
        }
        if let Ok(dir) = env::var("TRIPTYCH_SNAPSHOT_DIR") {
            if !dir.trim().is_empty() {
                self.snapshot_dir = Some(PathBuf::from(dir));
            }
        }
    }

    pub fn set_api_key(&mut self, key: impl Into<String>) {
        self.api_key = Some(key.into());
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// The API key, or a `MissingCredential` error when none is set.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(TriptychError::MissingCredential)
    }

    /// The snapshot directory: the configured one, or `snapshots` next to
    /// the config file, or a relative fallback when the platform has no
    /// config directory.
    pub fn snapshot_dir(&self) -> PathBuf {
        if let Some(dir) = &self.snapshot_dir {
            return dir.clone();
        }
        match dirs::config_dir() {
            Some(dir) => dir.join(APP_DIR).join("snapshots"),
            None => PathBuf::from("snapshots"),
        }
    }

    /// The API key with the middle elided, for display.
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None => "(not set)".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 8 {
                    "****".to_string()
                } else {
                    let head: String = chars[..4].iter().collect();
                    let tail: String = chars[chars.len() - 2..].iter().collect();
                    format!("{}****{}", head, tail)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let config = Config::load_from(&temp.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.set_api_key("test-key-123456789");
        config.debounce_ms = 250;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_require_api_key_errors_when_unset() {
        let config = Config::default();
        let err = config.require_api_key().unwrap_err();
        assert_eq!(err.error_code(), "MISSING_CREDENTIAL");
    }

    #[test]
    fn test_masked_api_key_elides_middle() {
        let mut config = Config::default();
        assert_eq!(config.masked_api_key(), "(not set)");

        config.set_api_key("short");
        assert_eq!(config.masked_api_key(), "****");

        config.set_api_key("AIzaSyExampleKey42");
        let masked = config.masked_api_key();
        assert!(masked.starts_with("AIza"));
        assert!(masked.ends_with("42"));
        assert!(masked.contains("****"));
        assert!(!masked.contains("Example"));
    }

    #[test]
    fn test_configured_snapshot_dir_wins() {
        let mut config = Config::default();
        config.snapshot_dir = Some(PathBuf::from("/tmp/custom-snapshots"));
        assert_eq!(config.snapshot_dir(), PathBuf::from("/tmp/custom-snapshots"));
    }
}
