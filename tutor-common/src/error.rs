//! Common error types for the rhythm tutor

use thiserror::Error;

/// Common result type for rhythm tutor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the tutor crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input (malformed pattern, bad parameter)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
