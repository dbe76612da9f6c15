//! Logger module
//!
//! Provides logging utilities for the relay:
//! - Server lifecycle logging
//! - Upstream fetch outcomes
//! - Access logging with multiple formats
//! - Leveled error/warning/debug output, optionally to files

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

/// Severity threshold, ordered from least to most verbose
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" | "trace" => Ok(Self::Debug),
            other => Err(format!("unknown log level '{other}'")),
        }
    }
}

/// Initialize the logger with configuration
///
/// Should be called once at application startup. An unknown level falls back to info.
pub fn init(config: &Config) -> std::io::Result<()> {
    let (level, unknown) = match config.logging.level.parse::<LogLevel>() {
        Ok(level) => (level, None),
        Err(e) => (LogLevel::Info, Some(e)),
    };
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )?;
    if let Some(e) = unknown {
        log_warning(&format!("{e}, using info"));
    }
    Ok(())
}

fn enabled(level: LogLevel) -> bool {
    writer::get().map_or(LogLevel::Info, writer::LogWriter::level) >= level
}

fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_info(message),
        None => println!("{message}"),
    }
}

fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

fn write_access(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    if !enabled(LogLevel::Info) {
        return;
    }
    write_info("======================================");
    write_info("PDF relay started successfully");
    write_info(&format!("Listening on: http://{addr}"));
    write_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.performance.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(max) = config.performance.max_connections {
        write_info(&format!("Max connections: {max}"));
    }
    match config.upstream.fetch_timeout() {
        Some(timeout) => write_info(&format!("Upstream fetch timeout: {}s", timeout.as_secs())),
        None => write_info("Upstream fetch timeout: none"),
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

pub fn log_route_registered(path: &str, description: &str) {
    if enabled(LogLevel::Info) {
        write_info(&format!("[Route] {path} -> {description}"));
    }
}

pub fn log_info(message: &str) {
    if enabled(LogLevel::Info) {
        write_info(&format!("[INFO] {message}"));
    }
}

pub fn log_debug(message: &str) {
    if enabled(LogLevel::Debug) {
        write_info(&format!("[DEBUG] {message}"));
    }
}

pub fn log_warning(message: &str) {
    if enabled(LogLevel::Warn) {
        write_error(&format!("[WARN] {message}"));
    }
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

pub fn log_upstream_resolved(url: &str, link: &str, elapsed: Duration) {
    log_info(&format!(
        "[Upstream] {url} -> {link} ({}ms)",
        elapsed.as_millis()
    ));
}

/// Log a failed resolution together with its underlying cause, if any
pub fn log_upstream_failed(err: &(dyn std::error::Error + 'static), elapsed: Duration) {
    let cause = err
        .source()
        .map(|source| format!(": {source}"))
        .unwrap_or_default();
    log_warning(&format!(
        "[Upstream] {err}{cause} ({}ms)",
        elapsed.as_millis()
    ));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_access(&entry.format(format));
}

pub fn log_shutdown_started(active: usize) {
    log_info(&format!(
        "[Shutdown] Listener closed, waiting for {active} active connection(s)"
    ));
}

pub fn log_shutdown_finished(drained: bool) {
    if drained {
        log_info("[Shutdown] All connections finished, exiting");
    } else {
        log_warning("[Shutdown] Grace period elapsed with connections still open, exiting");
    }
}
