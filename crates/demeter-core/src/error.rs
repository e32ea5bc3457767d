//! Error types for demeter-core

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// Input rejected before any side effect occurred
    #[error("validation error: {0}")]
    Validation(String),

    /// A function call failed (registry miss or handler failure)
    #[error(transparent)]
    Tool(#[from] demeter_tools::Error),

    /// The completion provider failed or exhausted its round-trips
    #[error(transparent)]
    Llm(#[from] demeter_llm::Error),

    /// The conversation store failed
    #[error("store error: {0}")]
    Store(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
