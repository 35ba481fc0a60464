//! Configuration management for hexchroma
//!
//! Handles loading `hexchroma.toml` files and applying environment overrides.

use crate::error::ConfigError;
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that overrides `server.port`.
pub const ENV_PORT: &str = "PORT";
/// Environment variable that overrides `server.host`.
pub const ENV_HOST: &str = "HEXCHROMA_HOST";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind host
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Base URL used in /docs example links (e.g. behind a reverse proxy)
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Permit binding on a non-loopback address
    #[serde(default)]
    pub allow_public_bind: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public_base_url: None,
            allow_public_bind: false,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-friendly output
    #[default]
    Pretty,
    /// JSON lines
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => f.write_str("pretty"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "unknown log format: {s}. Expected one of: pretty, json"
            )),
        }
    }
}

impl Config {
    /// Load configuration from `path` if given, otherwise use defaults, then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let mut config = match path {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: display.clone(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|e| match e {
            crate::Error::Config(ConfigError::ParseFailed { message, .. }) => {
                ConfigError::ParseFailed {
                    path: display,
                    message,
                }
                .into()
            }
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> crate::Result<Self> {
        toml::from_str(raw).map_err(|e| {
            ConfigError::ParseFailed {
                path: "<inline>".to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Apply `PORT` / `HEXCHROMA_HOST` from the given lookup.
    ///
    /// Empty values are ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.trim().is_empty()) {
            self.server.port = port
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_PORT.to_string(),
                    value: port.clone(),
                })?;
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.trim().is_empty()) {
            self.server.host = host.trim().to_string();
        }
        Ok(())
    }
}
