//! Demeter LLM - Model completion abstraction
//!
//! This crate defines the narrow contract between the coaching core and
//! whatever language-model backend hosts it:
//! - Message: conversation messages with roles and tool-call plumbing
//! - Completion: request/response types for plain and tool-calling runs
//! - Tools: function definitions and tool calls as the model sees them
//! - Provider: the `LlmProvider` trait implemented by concrete backends

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod completion;
pub mod error;
pub mod message;
pub mod provider;
pub mod tools;

pub use completion::{
    CompletionRequest, CompletionResponse, TokenUsage, ToolCompletionRequest,
    ToolCompletionResponse,
};
pub use error::{Error, Result};
pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use tools::{ToolCall, ToolChoice, ToolDefinition};
