//! Conversation persistence

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::conversation::ConversationState;
use crate::error::Result;

/// Backend for loading and saving conversation state.
///
/// Writes are whole-document and last-writer-wins: concurrent turns for the
/// same user may interleave, and the final save overwrites earlier ones.
/// Callers that need stronger guarantees should serialize turns per user
/// upstream of the orchestrator.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the conversation for a user, `None` if they have none yet
    async fn load(&self, user_id: &str) -> Result<Option<ConversationState>>;

    /// Persist the full conversation document
    async fn save(&self, state: &ConversationState) -> Result<()>;
}

/// In-memory store, suitable for tests and single-process deployments
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    conversations: Arc<RwLock<HashMap<String, ConversationState>>>,
}

impl InMemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored conversations
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// True when no conversations are stored
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryStore {
    async fn load(&self, user_id: &str) -> Result<Option<ConversationState>> {
        Ok(self.conversations.read().await.get(user_id).cloned())
    }

    async fn save(&self, state: &ConversationState) -> Result<()> {
        self.conversations
            .write()
            .await
            .insert(state.user_id.clone(), state.clone());
        Ok(())
    }
}
