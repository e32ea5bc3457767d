//! Conversation memory
//!
//! One `ConversationState` document per user, loaded at turn start and
//! replaced wholesale at turn end. The manager keeps the retained history
//! bounded by rotating older turns into an accumulated summary.

mod conversation;
mod manager;
mod store;

pub use conversation::{ChatRole, ConversationMessage, ConversationState, MessageMetadata};
pub use manager::{MemoryConfig, MemoryManager, SummaryParams};
pub use store::{ConversationStore, InMemoryStore};
