//! Configuration management for servicefinder using the prefer crate.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default backend location.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Errors from loading configuration or building clients from it.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(String),
    #[error("Failed to parse config file: {0}")]
    Parse(String),
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),
    #[error("Failed to create HTTP client: {0}")]
    Client(String),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the backend API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Per-request timeout in seconds. Unset means no timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
    /// User agent sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// File this config was loaded from, if any.
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_user_agent() -> String {
    format!("servicefinder/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_secs: None,
            user_agent: default_user_agent(),
            source_path: None,
        }
    }
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Falls back to defaults when no config file is found or it fails to parse.
    pub async fn load() -> Self {
        let discovered = match prefer::load("servicefinder").await {
            Ok(pref_config) => pref_config.source_path().map(|p| p.to_path_buf()),
            Err(_) => None,
        };

        let config = match discovered {
            Some(path) => match Self::load_from_path(&path).await {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Ignoring config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            None => Self::default(),
        };
        config.with_env_overrides()
    }

    /// Load configuration from an explicit path, or discover it.
    pub async fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Ok(Self::load_from_path(path).await?.with_env_overrides()),
            None => Ok(Self::load().await),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Read(format!("{}: {}", path.display(), e)))?;

        let mut config = Self::parse(&contents, path)?;
        config.source_path = Some(path.to_path_buf());
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
            "yaml" | "yml" => {
                serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `SERVICEFINDER_API_URL`
    /// - `SERVICEFINDER_TIMEOUT_SECS`
    /// - `SERVICEFINDER_USER_AGENT`
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("SERVICEFINDER_API_URL").filter(|v| !v.is_empty()) {
            self.api_url = url;
        }
        if let Some(secs) = lookup("SERVICEFINDER_TIMEOUT_SECS") {
            match secs.parse() {
                Ok(secs) => self.request_timeout_secs = Some(secs),
                Err(_) => tracing::warn!("Ignoring invalid SERVICEFINDER_TIMEOUT_SECS: {}", secs),
            }
        }
        if let Some(agent) = lookup("SERVICEFINDER_USER_AGENT").filter(|v| !v.is_empty()) {
            self.user_agent = agent;
        }
        self
    }

    /// Render the effective config as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}
