//! Demeter Core - Conversational turn orchestration
//!
//! This crate turns one user utterance into one grounded assistant reply:
//! - Memory: conversation state, history rotation and summarization
//! - Orchestrator: the turn lifecycle (validate, prefetch, invoke,
//!   sanitize, persist) with a per-turn audit trace of every function call
//!
//! Profile data, meal plans, visualizations and the language model itself
//! are collaborators reached through the traits in `demeter-tools` and
//! `demeter-llm`; this crate owns only the protocol between them.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod memory;
pub mod orchestrator;

pub use error::{Error, Result};
pub use memory::{
    ChatRole, ConversationMessage, ConversationState, ConversationStore, InMemoryStore,
    MemoryConfig, MemoryManager, MessageMetadata,
};
pub use orchestrator::{
    CallStatus, FunctionCallTrace, Orchestrator, OrchestratorConfig, TurnRequest, TurnResult,
    TurnTrace,
};
