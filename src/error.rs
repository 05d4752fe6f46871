//! Error types for set_counter

use thiserror::Error;

/// Unified error type for set_counter operations
///
/// Per-card lookup problems are not errors at this level: they are reported as
/// line outcomes (see [`crate::resolver::LookupError`]) and never abort a run.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading a decklist or fixture file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Failed to parse a JSON document
    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Building the HTTP client failed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    /// A newer run was started before this one finished
    #[error("Run {generation} was superseded by a newer submission")]
    Superseded { generation: u64 },
    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias for set_counter operations
pub type Result<T> = std::result::Result<T, Error>;
