//! Bridge Configuration Module
//!
//! Loads scheduler and logging settings from an optional TOML file with
//! environment variable overrides.

use crate::defaults;
use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming a TOML file to load
pub const CONFIG_PATH_ENV: &str = "TLBRIDGE_CONFIG";

/// Main bridge configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct BridgeConfig {
    /// Dedicated worker thread settings
    pub scheduler: SchedulerConfig,

    /// Process logging settings
    pub logging: LoggingConfig,
}

/// Worker thread settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub thread_name: String,
    /// Stack size in bytes; the platform default when unset
    pub stack_size: Option<usize>,
}

/// Logging settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

/// Log line format
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            thread_name: defaults::scheduler::THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::logging::LEVEL.to_string(),
            format: LogFormat::default(),
        }
    }
}

impl BridgeConfig {
    /// Load configuration: defaults, then `path` if given, then `TLBRIDGE_*`
    /// environment variables (`__` separates nested keys)
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading bridge config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(defaults::ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .context("Failed to build bridge configuration")?;

        let config: Self = config
            .try_deserialize()
            .context("Failed to deserialize bridge configuration")?;
        config.validate()?;

        debug!(?config, "Bridge configuration loaded");
        Ok(config)
    }

    /// Load using the file named by `TLBRIDGE_CONFIG`, if set
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        Self::load(path.as_deref())
    }

    fn validate(&self) -> Result<()> {
        if self.scheduler.thread_name.is_empty() {
            anyhow::bail!("scheduler.thread_name must not be empty");
        }
        if self.scheduler.thread_name.contains('\0') {
            anyhow::bail!("scheduler.thread_name must not contain NUL bytes");
        }
        if self.scheduler.stack_size == Some(0) {
            anyhow::bail!("scheduler.stack_size must be greater than zero");
        }
        Ok(())
    }
}
