//! Client configuration.
//!
//! Resolved in priority order:
//! 1. `--config <path>` flag (must exist)
//! 2. `{config_dir}/PayrollChat/settings.json`, generated with defaults when
//!    missing
//!
//! Command line flags are applied on top by the caller.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "PayrollChat";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the query-answering service; `/chat` is appended.
    pub endpoint: String,
    /// Maximum question/answer exchanges per session.
    pub question_limit: u32,
    /// Query sent at login to validate the employee ID.
    pub greeting_query: String,
    /// Seconds an error banner stays visible.
    pub banner_ttl_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:5000".to_string(),
            question_limit: 10,
            greeting_query: "Hello".to_string(),
            banner_ttl_secs: 3,
        }
    }
}

impl ClientConfig {
    pub fn banner_ttl(&self) -> Duration {
        Duration::from_secs(self.banner_ttl_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_limit == 0 {
            return Err(ConfigError::Invalid(
                "question_limit must be at least 1".to_string(),
            ));
        }
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }
        if self.greeting_query.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "greeting_query must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads and validates a settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the settings file at `path`, writing the defaults there first if
    /// it does not exist yet.
    pub fn load_or_initialize(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            write_settings(path, &config)?;
            tracing::info!(path = %path.display(), "generated default settings");
            return Ok(config);
        }
        Self::load(path)
    }
}

/// Resolve the client config following the priority chain.
pub fn resolve_config(config_flag: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match config_flag {
        Some(path) => ClientConfig::load(path),
        None => ClientConfig::load_or_initialize(&default_settings_path()?),
    }
}

/// `{config_dir}/PayrollChat/settings.json`
pub fn default_settings_path() -> Result<PathBuf, ConfigError> {
    let dir = dirs_next::config_dir().ok_or(ConfigError::NoConfigDir)?;
    Ok(dir.join(APP_DIR).join(SETTINGS_FILE))
}

/// `{data_dir}/PayrollChat/logs`, falling back to a local `logs` directory.
pub fn log_dir() -> PathBuf {
    dirs_next::data_dir()
        .map(|d| d.join(APP_DIR).join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

fn write_settings(path: &Path, config: &ClientConfig) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, content).map_err(io_err)
}
