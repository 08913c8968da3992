//! Configuration module for tally-server.
//!
//! Handles loading configuration from an optional TOML file and CLI
//! overrides, then validating it into the runtime types of `tally-core`.

pub mod file;

use crate::config::file::FileConfig;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tally_core::config::{PipelineConfig, ReportConfig, ServerConfig, SharedConfig};
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub pipeline: PipelineConfig,
    pub report: ReportConfig,
}

impl LoadedConfig {
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.pipeline, self.report)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader. Without a path, built-in defaults are used.
    pub fn new(config_path: Option<impl AsRef<Path>>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            listen_override,
        }
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Read, override and validate the configuration.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let mut file_config = match &self.config_path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => FileConfig::default(),
        };

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
            },
            pipeline: PipelineConfig {
                queue_capacity: file_config.pipeline.queue_capacity,
                workers: file_config.pipeline.workers,
                overflow: file_config.pipeline.overflow,
            },
            report: ReportConfig {
                enabled: file_config.report.enabled,
            },
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.pipeline.queue_capacity == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.queue_capacity must be greater than 0".to_string(),
        ));
    }
    if config.pipeline.workers == 0 {
        return Err(ConfigError::ValidationError(
            "pipeline.workers must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
