//! Error types for the webhook process.

use thiserror::Error;

/// Error type for startup and server operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid or unparsable configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// TLS configuration error
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// Server error
    #[error("Webhook server error: {0}")]
    Server(String),

    /// I/O error while binding or serving
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for process operations
pub type Result<T> = std::result::Result<T, Error>;
