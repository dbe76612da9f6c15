//! Error types
//!
//! `ResolveError` covers everything that can go wrong while turning the source
//! page into a document link. Its `Display` output is the exact diagnostic
//! text returned to callers, so handlers can write `err.to_string()` as-is.

use std::net::SocketAddr;
use thiserror::Error;

/// Failure outcomes of a link resolution
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The source page could not be reached
    #[error("failed to get page from {url}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response arrived but its body could not be drained
    #[error("Failed to read body from {url}")]
    ReadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The page was fetched but nothing matched the extraction pattern
    #[error("could not find pdf file from {url}")]
    NotFound { url: String },

    /// The extraction pattern is not a valid regular expression
    #[error("invalid extraction pattern: {0}")]
    PatternCompileFailed(#[from] regex::Error),

    /// The source page URL is not a well-formed absolute URL
    #[error("invalid source page url '{url}': {source}")]
    InvalidPageUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

/// Errors that abort the process before or while binding the listener
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("failed to open log files: {0}")]
    Logger(#[source] std::io::Error),

    #[error("failed to build tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("failed to build upstream HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Resolver(#[from] ResolveError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}
