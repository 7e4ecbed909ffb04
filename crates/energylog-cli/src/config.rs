//! Configuration file management.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use energylog_store::{DeletePolicy, WINDOW_SIZE};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "ENERGYLOG_CONFIG";

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Database file
    #[serde(default)]
    pub database: Option<PathBuf>,

    /// Default window size for `latest` and `earliest`
    #[serde(default)]
    pub window: Option<u32>,

    /// Default output format
    #[serde(default)]
    pub format: Option<OutputFormat>,

    /// How `trim` addresses the rows it deletes
    #[serde(default)]
    pub delete_policy: DeletePolicy,
}

impl Config {
    /// Get the config file path
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
            return PathBuf::from(path);
        }
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("energylog")
            .join("config.toml")
    }

    /// Load config from the default location, or return default if not found
    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Load config from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match fs::read_to_string(path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path())
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }
}

/// Resolve the database path: flag or env var, then config, then platform default.
pub fn resolve_db_path(flag: Option<PathBuf>, config: &Config) -> PathBuf {
    flag.or_else(|| config.database.clone())
        .unwrap_or_else(energylog_store::default_db_path)
}

/// Resolve window size: explicit count, then config, then [`WINDOW_SIZE`].
pub fn resolve_window(count: Option<u32>, config: &Config) -> u32 {
    count.or(config.window).unwrap_or(WINDOW_SIZE)
}

/// Resolve output format: flag, then config, then text.
pub fn resolve_format(flag: Option<OutputFormat>, config: &Config) -> OutputFormat {
    flag.or(config.format).unwrap_or_default()
}

/// Resolve delete policy: `--by-timestamp` wins over config.
pub fn resolve_delete_policy(by_timestamp: bool, config: &Config) -> DeletePolicy {
    if by_timestamp {
        DeletePolicy::Timestamp
    } else {
        config.delete_policy
    }
}
