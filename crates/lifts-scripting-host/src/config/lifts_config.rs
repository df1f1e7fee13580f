use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::scripting_config::ScriptingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Could not determine config directory")]
    NoConfigDir,
    #[error("IO error reading config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file in the data directory
    #[serde(default)]
    pub file: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiftsConfig {
    /// Scripting configuration
    #[serde(default)]
    pub scripting: ScriptingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LiftsConfig {
    pub fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "lifts")
    }

    pub fn config_path() -> Result<PathBuf, ConfigLoadError> {
        Self::project_dirs()
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(ConfigLoadError::NoConfigDir)
    }

    /// Load from the platform config directory
    pub fn load() -> Result<Self, ConfigLoadError> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load, falling back to defaults when no config file exists yet
    pub fn load_or_default() -> Result<Self, ConfigLoadError> {
        match Self::load() {
            Err(ConfigLoadError::NotFound(_)) | Err(ConfigLoadError::NoConfigDir) => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigLoadError> {
        let io_error = |source: std::io::Error| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        };

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(io_error)?;
        info!("Saved config to {}", path.display());
        Ok(())
    }
}
