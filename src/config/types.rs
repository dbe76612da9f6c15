// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ACCESS_LOG_FORMAT: &str = "combined";
pub const DEFAULT_CONNECTION_TIMEOUT: u64 = 60;
pub const DEFAULT_SHUTDOWN_GRACE_PERIOD: u64 = 10;
pub const DEFAULT_FETCH_TIMEOUT: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub upstream: UpstreamConfig,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Minimum level written: error, warn, info or debug
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            access_log: true,
            access_log_format: DEFAULT_ACCESS_LOG_FORMAT.to_string(),
            access_log_file: None,
            error_log_file: None,
        }
    }
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    /// Tokio worker threads; CPU core count when unset
    #[serde(default)]
    pub workers: Option<usize>,
    pub keep_alive: bool,
    /// Seconds a connection may sit idle or spend sending request headers;
    /// 0 disables the limit. Request handling itself is not bounded here.
    pub connection_timeout: u64,
    #[serde(default)]
    pub max_connections: Option<u64>,
    /// How long shutdown waits for in-flight connections, in seconds
    pub shutdown_grace_period: u64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            workers: None,
            keep_alive: true,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            max_connections: None,
            shutdown_grace_period: DEFAULT_SHUTDOWN_GRACE_PERIOD,
        }
    }
}

/// Outbound fetch configuration
#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Whole-request timeout for the source page fetch in seconds, 0 disables it
    pub fetch_timeout: u64,
    pub user_agent: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
