//! Error types for demeter-tools

use thiserror::Error;

/// Tool error type
#[derive(Debug, Error)]
pub enum Error {
    /// Function name not present in the registry
    #[error("unsupported function: {0}")]
    UnsupportedFunction(String),

    /// Invalid input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Handler execution failed
    #[error("execution failed: {0}")]
    Execution(String),

    /// A collaborator service failed
    #[error("service error: {0}")]
    Service(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
