//! Client configuration.
//!
//! Read from `<config dir>/airwatch/config.json` (or an explicit path), then
//! overridden from the command line / `AIRWATCH_API_KEY`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AirwatchError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.airvisual.com/v2";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout; `None` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_user_agent() -> String {
    format!("airwatch/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("airwatch")
            .join("config.json")
    }

    /// Load from `path`, or from the default location if none is given.
    ///
    /// A missing default file yields the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_path(), false),
        };

        if !path.exists() {
            if required {
                return Err(AirwatchError::Config(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)
            .map_err(|e| AirwatchError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key {
            self.api_key = key;
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(AirwatchError::Config(
                "no API key; set api_key in the config file, AIRWATCH_API_KEY, or --api-key".into(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(AirwatchError::Config(format!("base_url '{}' is not an http(s) URL", self.base_url)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert!(c.timeout_secs.is_none());
        assert!(c.user_agent.starts_with("airwatch/"));
    }

    #[test]
    fn test_load_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "api_key": "abc123", "timeout_secs": 15 }"#).unwrap();

        let c = Config::load(Some(&path)).unwrap();
        assert_eq!(c.api_key, "abc123");
        assert_eq!(c.timeout_secs, Some(15));
        assert_eq!(c.base_url, DEFAULT_BASE_URL);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.json"))).unwrap_err();
        assert!(matches!(err, AirwatchError::Config(_)));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(Config::load(Some(&path)), Err(AirwatchError::Config(_))));
    }

    #[test]
    fn test_key_override_and_validation() {
        let c = Config::default();
        assert!(c.validate().is_err());

        let c = c.with_api_key(Some("from-flag".into()));
        assert_eq!(c.api_key, "from-flag");
        assert!(c.validate().is_ok());

        let c = c.with_api_key(None);
        assert_eq!(c.api_key, "from-flag");
    }

    #[test]
    fn test_bad_base_url() {
        let c = Config {
            api_key: "k".into(),
            base_url: "ftp://example.com".into(),
            ..Config::default()
        };
        assert!(c.validate().is_err());
    }
}
