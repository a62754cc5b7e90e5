//! # tlbridge Configuration
//!
//! Centralized configuration for the bridge: the dedicated scheduler thread
//! and the process logging setup.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tlbridge_config::BridgeConfig;
//!
//! // defaults < optional TOML file < TLBRIDGE_* environment variables
//! let config = BridgeConfig::load(None).unwrap();
//! assert!(!config.scheduler.thread_name.is_empty());
//! ```

pub mod bridge_config;
pub mod defaults;

// Re-export commonly used types
pub use bridge_config::{BridgeConfig, LogFormat, LoggingConfig, SchedulerConfig, CONFIG_PATH_ENV};
