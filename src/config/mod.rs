// Configuration module entry point
// Loads application configuration and holds the shared runtime state

mod state;
mod types;

use std::time::Duration;

// Re-export public types
pub use state::AppState;
pub use types::{Config, PerformanceConfig, UpstreamConfig};

use types::{
    DEFAULT_ACCESS_LOG_FORMAT, DEFAULT_CONNECTION_TIMEOUT, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_LOG_LEVEL, DEFAULT_SHUTDOWN_GRACE_PERIOD, DEFAULT_USER_AGENT,
};

/// Config file looked up in the working directory (extension resolved by the `config` crate)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from `config.toml` in the working directory
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from specified file path (without extension)
    /// A missing file is not an error; every key has a default
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", DEFAULT_ACCESS_LOG_FORMAT)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", DEFAULT_CONNECTION_TIMEOUT)?
            .set_default(
                "performance.shutdown_grace_period",
                DEFAULT_SHUTDOWN_GRACE_PERIOD,
            )?
            .set_default("upstream.fetch_timeout", DEFAULT_FETCH_TIMEOUT)?
            .set_default("upstream.user_agent", DEFAULT_USER_AGENT)?
            .build()?;

        settings.try_deserialize()
    }
}

impl PerformanceConfig {
    /// `None` when idle connections are never cut
    pub const fn connection_timeout(&self) -> Option<Duration> {
        if self.connection_timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(self.connection_timeout))
        }
    }

    pub const fn shutdown_grace_period(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_period)
    }
}

impl UpstreamConfig {
    /// `None` when the fetch should wait indefinitely
    pub const fn fetch_timeout(&self) -> Option<Duration> {
        if self.fetch_timeout == 0 {
            None
        } else {
            Some(Duration::from_secs(self.fetch_timeout))
        }
    }
}
