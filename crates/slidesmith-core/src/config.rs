//! Configuration management.
//!
//! Loads configuration from ${SLIDESMITH_HOME}/config.toml with sensible
//! defaults. The channel endpoint may also be overridden through the
//! `SLIDESMITH_ENDPOINT` environment variable.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default generation endpoint when nothing is configured.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8001/ws/generate";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// WebSocket endpoint of the generation agent.
    pub endpoint: String,
    /// Default theme id used for exports.
    pub theme: String,
    /// Directory export artifacts are written to.
    pub export_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            theme: "corporate".to_string(),
            export_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Loads configuration from the default config path, then applies
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&paths::config_path())?;
        if let Ok(endpoint) = std::env::var("SLIDESMITH_ENDPOINT") {
            if !endpoint.is_empty() {
                config.endpoint = endpoint;
            }
        }
        Ok(config)
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }
}

pub mod paths {
    //! Config path resolution.
    //!
    //! SLIDESMITH_HOME resolution order:
    //! 1. SLIDESMITH_HOME environment variable (if set)
    //! 2. ~/.slidesmith

    use std::path::PathBuf;

    /// Returns the SlideSmith home directory.
    pub fn slidesmith_home() -> PathBuf {
        if let Ok(home) = std::env::var("SLIDESMITH_HOME") {
            return PathBuf::from(home);
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".slidesmith")
    }

    /// Returns the path to config.toml.
    pub fn config_path() -> PathBuf {
        slidesmith_home().join("config.toml")
    }
}
