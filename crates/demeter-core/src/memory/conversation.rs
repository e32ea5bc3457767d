//! Conversation state and message types

use chrono::{DateTime, Utc};
use demeter_tools::VisualizationPayload;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a stored conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Message written by the user
    User,
    /// Message produced by the assistant
    Assistant,
}

impl ChatRole {
    /// Returns the string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// Metadata attached to an assistant message
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Chart payloads produced while answering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub visualizations: Vec<VisualizationPayload>,
    /// Topic tags the turn touched
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
}

impl MessageMetadata {
    /// True when there is nothing worth persisting
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.visualizations.is_empty() && self.topics.is_empty()
    }
}

/// One stored conversation message, immutable once created
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message id
    pub id: Uuid,
    /// Who wrote it
    pub role: ChatRole,
    /// Message text
    pub content: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Optional metadata (assistant messages only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl ConversationMessage {
    /// Create a user message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::User,
            content: content.into(),
            created_at: Utc::now(),
            metadata: None,
        }
    }

    /// Create an assistant message
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: ChatRole::Assistant,
            content: content.into(),
            created_at: Utc::now(),
            metadata: None,
        }
    }

    /// Attach metadata; empty metadata is dropped rather than stored
    #[must_use]
    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = if metadata.is_empty() {
            None
        } else {
            Some(metadata)
        };
        self
    }
}

/// Conversation document for one user.
///
/// `summary` is `None` until the first rotation; afterwards each rotation
/// feeds the previous summary back into the compression, so it
/// accumulates rather than being overwritten blindly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// User the conversation belongs to
    pub user_id: String,
    /// Accumulated summary of rotated-out history
    #[serde(default)]
    pub summary: Option<String>,
    /// Topic tags seen so far, in first-seen order
    #[serde(default)]
    pub topics: Vec<String>,
    /// Messages, oldest first
    #[serde(default)]
    pub messages: Vec<ConversationMessage>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    /// Create an empty conversation for a user
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            summary: None,
            topics: Vec::new(),
            messages: Vec::new(),
            updated_at: Utc::now(),
        }
    }

    /// Append a message
    pub fn push(&mut self, message: ConversationMessage) {
        self.messages.push(message);
        self.updated_at = Utc::now();
    }

    /// The most recent `n` messages, oldest first
    #[must_use]
    pub fn context_window(&self, n: usize) -> &[ConversationMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Merge topic tags, deduplicated, preserving first-seen order
    pub fn merge_topics(&mut self, tags: &[String]) {
        for tag in tags {
            if !self.topics.iter().any(|t| t == tag) {
                self.topics.push(tag.clone());
            }
        }
    }

    /// Keep only the most recent `n` messages
    pub fn trim_to(&mut self, n: usize) {
        if self.messages.len() > n {
            let excess = self.messages.len() - n;
            self.messages.drain(0..excess);
            self.updated_at = Utc::now();
        }
    }

    /// Message count
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_window() {
        let mut state = ConversationState::new("u1");
        for i in 0..5 {
            state.push(ConversationMessage::user(format!("message {i}")));
        }
        assert_eq!(state.message_count(), 5);

        let window = state.context_window(3);
        assert_eq!(window.len(), 3);
        assert_eq!(window[0].content, "message 2");
        assert_eq!(window[2].content, "message 4");

        // Window larger than history returns everything.
        assert_eq!(state.context_window(100).len(), 5);
    }

    #[test]
    fn test_trim_to_keeps_most_recent() {
        let mut state = ConversationState::new("u1");
        for i in 0..14 {
            state.push(ConversationMessage::user(format!("message {i}")));
        }
        state.trim_to(8);
        assert_eq!(state.message_count(), 8);
        assert_eq!(state.messages[0].content, "message 6");
    }

    #[test]
    fn test_merge_topics_deduplicates() {
        let mut state = ConversationState::new("u1");
        state.merge_topics(&["metrics".to_string(), "goals".to_string()]);
        state.merge_topics(&["goals".to_string(), "visualization".to_string()]);
        assert_eq!(state.topics, vec!["metrics", "goals", "visualization"]);
    }

    #[test]
    fn test_empty_metadata_is_dropped() {
        let msg = ConversationMessage::assistant("hi").with_metadata(MessageMetadata::default());
        assert!(msg.metadata.is_none());

        let msg = ConversationMessage::assistant("hi").with_metadata(MessageMetadata {
            topics: vec!["metrics".to_string()],
            ..Default::default()
        });
        assert!(msg.metadata.is_some());
    }
}
