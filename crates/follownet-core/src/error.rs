//! Error types for Follownet Core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using Follownet Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for the follows-graph engine
#[derive(Error, Debug)]
pub enum Error {
    /// An input file could not be opened or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File the operation was working on
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Caller supplied an argument the operation cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation is not allowed in the store's current lifecycle stage
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Configuration could not be interpreted
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an invalid state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
