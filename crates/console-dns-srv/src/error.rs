//! Error types for the console-dns server.

use thiserror::Error;

/// Errors that can occur in console-dns-srv operations.
///
/// Only [`SrvError::Config`] and [`SrvError::Server`] stop the process; the
/// refresh pipeline logs every other variant and keeps serving.
#[derive(Error, Debug)]
pub enum SrvError {
    /// Every catalogue source failed on one refresh.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// Durable cache could not be read or written.
    #[error("cache error: {0}")]
    Cache(String),

    /// Cached or fetched catalogue document is malformed.
    #[error("malformed zone snapshot: {0}")]
    Snapshot(String),

    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(String),

    /// DNS server failed to bind or run.
    #[error("dns server error: {0}")]
    Server(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
