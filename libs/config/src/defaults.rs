//! Default configuration values

/// Scheduler defaults
pub mod scheduler {
    /// Name of the dedicated worker thread
    pub const THREAD_NAME: &str = "tlbridge-scheduler";
}

/// Logging defaults
pub mod logging {
    /// Filter used when `RUST_LOG` is not set
    pub const LEVEL: &str = "info";
}

/// Prefix for environment overrides, e.g. `TLBRIDGE_LOGGING__LEVEL`
pub const ENV_PREFIX: &str = "TLBRIDGE";
