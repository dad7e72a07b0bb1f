//! Error types for model session operations

use thiserror::Error;

/// Errors that can occur while driving a model session
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid construction parameters, or the model rejected its configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// World or population generation failed
    #[error("Initialization error: {0}")]
    Initialization(String),
    /// Malformed bundle vector or unknown bidder
    #[error("Argument error: {0}")]
    Argument(String),
    /// Winner determination failed or produced an inconsistent allocation
    #[error("Solver error: {0}")]
    Solver(String),
    /// The model answered with something that breaks its own contract
    #[error("Backend error: {0}")]
    Backend(String),
    /// The connection to an out-of-process model broke or carried garbage
    #[error("Transport error: {0}")]
    Transport(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Transport(format!("malformed message: {}", e))
    }
}

/// A specialized Result type for model session operations
pub type Result<T> = std::result::Result<T, Error>;
