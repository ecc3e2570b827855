//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! the API base URL, the startup verification timeout, which credential
//! backend to use, and the last email used to sign in.
//!
//! Configuration is stored at `~/.config/carebridge/config.json`. The
//! `CAREBRIDGE_API_URL` environment variable overrides the stored URL.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_URL;
use crate::auth::{
    CredentialStore, FileCredentialStore, KeyringCredentialStore, DEFAULT_VERIFY_TIMEOUT,
};

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "carebridge";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the API base URL
pub const API_URL_ENV: &str = "CAREBRIDGE_API_URL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    /// `token` file in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub api_url: Option<String>,
    /// Seconds to wait for startup verification; 0 waits indefinitely
    pub verify_timeout_secs: Option<u64>,
    #[serde(default)]
    pub credential_backend: CredentialBackend,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// API base URL: environment, then config file, then the default
    pub fn api_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn verify_timeout(&self) -> Option<Duration> {
        match self.verify_timeout_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(DEFAULT_VERIFY_TIMEOUT),
        }
    }

    /// The credential store selected by `credential_backend`
    pub fn credential_store(&self) -> Result<Arc<dyn CredentialStore>> {
        Ok(match self.credential_backend {
            CredentialBackend::File => Arc::new(FileCredentialStore::new(self.cache_dir()?)),
            CredentialBackend::Keyring => Arc::new(KeyringCredentialStore::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config: Config = serde_json::from_str("{}").expect("Failed to parse empty config");
        assert_eq!(config.credential_backend, CredentialBackend::File);
        assert_eq!(config.verify_timeout(), Some(DEFAULT_VERIFY_TIMEOUT));
        assert_eq!(config.resolve_api_url(None), DEFAULT_API_URL);
    }

    #[test]
    fn test_api_url_precedence() {
        let config = Config {
            api_url: Some("https://carebridge.example.com/api".to_string()),
            ..Config::default()
        };
        assert_eq!(config.resolve_api_url(None), "https://carebridge.example.com/api");
        assert_eq!(
            config.resolve_api_url(Some("http://127.0.0.1:9000/api".to_string())),
            "http://127.0.0.1:9000/api"
        );
        assert_eq!(
            config.resolve_api_url(Some("  ".to_string())),
            "https://carebridge.example.com/api"
        );
    }

    #[test]
    fn test_verify_timeout_zero_disables() {
        let config = Config {
            verify_timeout_secs: Some(0),
            ..Config::default()
        };
        assert_eq!(config.verify_timeout(), None);

        let config = Config {
            verify_timeout_secs: Some(3),
            ..Config::default()
        };
        assert_eq!(config.verify_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_parse_keyring_backend() {
        let config: Config = serde_json::from_str(r#"{"credential_backend": "keyring", "last_email": "a@b.com"}"#)
            .expect("Failed to parse config");
        assert_eq!(config.credential_backend, CredentialBackend::Keyring);
        assert_eq!(config.last_email.as_deref(), Some("a@b.com"));
    }
}
