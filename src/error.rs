//! Error types for Slotwatch
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::slots::ParseError;

/// Main error type for Slotwatch operations
///
/// This enum encompasses all possible errors that can occur during
/// configuration loading, booking-site interactions, listing parsing,
/// and notification delivery.
#[derive(Error, Debug)]
pub enum SlotwatchError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport-level failures shaped by the remote site (bad status,
    /// missing session cookie, truncated responses)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The remote site actively refused a request (e.g., 401/403 on a
    /// booking submission)
    #[error("Remote rejection: {0}")]
    RemoteRejection(String),

    /// Listing page extraction errors
    #[error("Listing parse error: {0}")]
    Parse(#[from] ParseError),

    /// Notification delivery errors
    #[error("Notification error: {0}")]
    Notify(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl SlotwatchError {
    /// Whether this error should abort the process instead of the current
    /// poll cycle
    ///
    /// Only configuration problems are unrecoverable. Everything that can
    /// happen mid-cycle (network trouble, a reshaped listing page, a
    /// rejected booking, a failed notification) is survivable and the watch
    /// loop retries it on the next cycle.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SlotwatchError::Config(_))
    }

    /// Stable label for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            SlotwatchError::Config(_) => "config",
            SlotwatchError::Transport(_) | SlotwatchError::Http(_) => "transport",
            SlotwatchError::RemoteRejection(_) => "remote_rejection",
            SlotwatchError::Parse(_) => "parse",
            SlotwatchError::Notify(_) => "notify",
            SlotwatchError::Io(_) => "io",
            SlotwatchError::Serialization(_) | SlotwatchError::Yaml(_) => "serialization",
        }
    }
}

/// Result type alias for Slotwatch operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
