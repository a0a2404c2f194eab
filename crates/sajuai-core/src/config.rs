//! Application configuration management.
//!
//! Configuration is stored at `~/.config/sajuai/config.json` and may be
//! overridden per process by environment variables:
//!
//! - `SAJUAI_API_URL`: backend base URL
//! - `SAJUAI_TIMEOUT_SECS`: per-request timeout
//! - `SAJUAI_USE_KEYRING`: keep tokens in the OS keychain (`1`/`true`)
//! - `SAJUAI_DATA_DIR`: where the session and result cache are persisted

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Application name used for config/data directory paths
const APP_NAME: &str = "sajuai";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Upper bound for any single request. Fortune calls wait on an LLM
/// backend, so this is generous.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub use_keyring: bool,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            use_keyring: false,
            data_dir: None,
        }
    }
}

impl Config {
    /// Load the config file (or defaults) and apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `SAJUAI_*` overrides from `lookup`. Unparseable values are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SAJUAI_API_URL").filter(|v| !v.trim().is_empty()) {
            self.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup("SAJUAI_TIMEOUT_SECS") {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => self.timeout_secs = secs,
                _ => warn!(value = %raw, "Ignoring invalid SAJUAI_TIMEOUT_SECS"),
            }
        }
        if let Some(raw) = lookup("SAJUAI_USE_KEYRING") {
            match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.use_keyring = true,
                "0" | "false" | "no" | "off" => self.use_keyring = false,
                _ => warn!(value = %raw, "Ignoring invalid SAJUAI_USE_KEYRING"),
            }
        }
        if let Some(dir) = lookup("SAJUAI_DATA_DIR").filter(|v| !v.trim().is_empty()) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory holding the persisted session and result cache
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert!(!config.use_keyring);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("SAJUAI_API_URL", "https://saju.example.com/api"),
            ("SAJUAI_TIMEOUT_SECS", "15"),
            ("SAJUAI_USE_KEYRING", "true"),
            ("SAJUAI_DATA_DIR", "/tmp/sajuai-data"),
        ]));

        assert_eq!(config.api_url, "https://saju.example.com/api");
        assert_eq!(config.timeout_secs, 15);
        assert!(config.use_keyring);
        assert_eq!(config.data_dir().unwrap(), PathBuf::from("/tmp/sajuai-data"));
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(lookup_from(&[
            ("SAJUAI_TIMEOUT_SECS", "soon"),
            ("SAJUAI_USE_KEYRING", "maybe"),
            ("SAJUAI_API_URL", "  "),
        ]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_config_file_uses_defaults() {
        let config: Config = serde_json::from_str(r#"{"use_keyring": true}"#).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.use_keyring);
    }
}
