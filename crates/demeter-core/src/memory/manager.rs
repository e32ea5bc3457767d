//! Conversation rotation and summarization

use std::sync::Arc;

use demeter_llm::{CompletionRequest, LlmProvider, Message};
use tracing::{debug, info, warn};

use super::conversation::ConversationState;
use super::store::ConversationStore;
use crate::error::Result;

/// Prompt used to compress rotated-out history
const SUMMARY_PROMPT: &str = "You compress coaching conversations. Produce at most \
three short bullet points capturing the user's goals, reported metrics, and any \
commitments made. Keep numeric values and their units exactly as written. Output \
only the bullet points.";

/// Sizing knobs for conversation memory
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Messages handed to the model each turn
    pub context_window: usize,
    /// Message count that triggers rotation
    pub rotation_threshold: usize,
    /// Messages kept after a rotation
    pub retained_after_rotation: usize,
    /// Most recent messages fed into the summarizer
    pub summarize_window: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            context_window: 12,
            rotation_threshold: 14,
            retained_after_rotation: 8,
            summarize_window: 10,
        }
    }
}

impl MemoryConfig {
    /// Create with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-turn context window
    #[must_use]
    pub fn with_context_window(mut self, n: usize) -> Self {
        self.context_window = n;
        self
    }

    /// Set the rotation threshold
    #[must_use]
    pub fn with_rotation_threshold(mut self, n: usize) -> Self {
        self.rotation_threshold = n;
        self
    }

    /// Set how many messages survive a rotation
    #[must_use]
    pub fn with_retained_after_rotation(mut self, n: usize) -> Self {
        self.retained_after_rotation = n;
        self
    }
}

/// Model parameters for the summarization call
#[derive(Debug, Clone)]
pub struct SummaryParams {
    /// Model identifier
    pub model: String,
    /// Sampling temperature, low for faithful compression
    pub temperature: f32,
    /// Token cap for the summary
    pub max_tokens: u32,
}

impl Default for SummaryParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            temperature: 0.2,
            max_tokens: 256,
        }
    }
}

/// Loads, rotates, and saves conversation state
pub struct MemoryManager {
    store: Arc<dyn ConversationStore>,
    config: MemoryConfig,
}

impl MemoryManager {
    /// Create a manager over a store
    pub fn new(store: Arc<dyn ConversationStore>, config: MemoryConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Load the user's conversation, creating an empty one if missing
    pub async fn load_or_create(&self, user_id: &str) -> Result<ConversationState> {
        match self.store.load(user_id).await? {
            Some(state) => Ok(state),
            None => {
                debug!(user_id = %user_id, "starting new conversation");
                Ok(ConversationState::new(user_id))
            }
        }
    }

    /// Persist the state
    pub async fn save(&self, state: &ConversationState) -> Result<()> {
        self.store.save(state).await
    }

    /// Rotate the conversation when it has grown past the threshold.
    ///
    /// On rotation the most recent messages are summarized into the state's
    /// running summary and older messages are dropped. A failed or empty
    /// summarization keeps the previous summary; trimming happens regardless
    /// so the conversation cannot grow without bound. Returns whether a
    /// rotation occurred.
    pub async fn rotate_if_needed(
        &self,
        state: &mut ConversationState,
        provider: &dyn LlmProvider,
        params: &SummaryParams,
    ) -> bool {
        if state.message_count() < self.config.rotation_threshold {
            return false;
        }

        let transcript = self.build_transcript(state);
        let request = CompletionRequest::new(&params.model)
            .with_message(Message::system(SUMMARY_PROMPT))
            .with_message(Message::user(transcript))
            .with_temperature(params.temperature)
            .with_max_tokens(params.max_tokens);

        match provider.complete(request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                state.summary = Some(response.content.trim().to_string());
                info!(
                    user_id = %state.user_id,
                    messages = state.message_count(),
                    "rotated conversation with fresh summary"
                );
            }
            Ok(_) => {
                warn!(user_id = %state.user_id, "summarizer returned empty content, keeping prior summary");
            }
            Err(e) => {
                warn!(user_id = %state.user_id, error = %e, "summarization failed, keeping prior summary");
            }
        }

        state.trim_to(self.config.retained_after_rotation);
        true
    }

    /// Prior summary plus the most recent messages, oldest first
    fn build_transcript(&self, state: &ConversationState) -> String {
        let mut transcript = String::new();
        if let Some(summary) = &state.summary {
            transcript.push_str("Previous summary:\n");
            transcript.push_str(summary);
            transcript.push_str("\n\n");
        }
        transcript.push_str("Recent messages:\n");
        for message in state.context_window(self.config.summarize_window) {
            transcript.push_str(message.role.as_str());
            transcript.push_str(": ");
            transcript.push_str(&message.content);
            transcript.push('\n');
        }
        transcript
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ConversationMessage, InMemoryStore};
    use async_trait::async_trait;
    use demeter_llm::{
        CompletionResponse, ToolCompletionRequest, ToolCompletionResponse,
    };

    struct FixedSummaryProvider {
        summary: String,
    }

    #[async_trait]
    impl LlmProvider for FixedSummaryProvider {
        fn name(&self) -> &str {
            "fixed-summary"
        }

        fn supports_tools(&self) -> bool {
            false
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> demeter_llm::Result<CompletionResponse> {
            Ok(CompletionResponse {
                content: self.summary.clone(),
                usage: None,
                finish_reason: Some("stop".to_string()),
                model: "fixed".to_string(),
            })
        }

        async fn complete_with_tools(
            &self,
            _request: ToolCompletionRequest,
        ) -> demeter_llm::Result<ToolCompletionResponse> {
            Err(demeter_llm::Error::NotConfigured(
                "tools unsupported".to_string(),
            ))
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl LlmProvider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        fn supports_tools(&self) -> bool {
            false
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> demeter_llm::Result<CompletionResponse> {
            Err(demeter_llm::Error::Api("unavailable".to_string()))
        }

        async fn complete_with_tools(
            &self,
            _request: ToolCompletionRequest,
        ) -> demeter_llm::Result<ToolCompletionResponse> {
            Err(demeter_llm::Error::Api("unavailable".to_string()))
        }
    }

    fn manager() -> MemoryManager {
        MemoryManager::new(Arc::new(InMemoryStore::new()), MemoryConfig::default())
    }

    fn filled_state(n: usize) -> ConversationState {
        let mut state = ConversationState::new("u1");
        for i in 0..n {
            state.push(ConversationMessage::user(format!("message {i}")));
        }
        state
    }

    #[tokio::test]
    async fn test_no_rotation_below_threshold() {
        let manager = manager();
        let mut state = filled_state(13);
        let provider = FixedSummaryProvider {
            summary: "- bullet".to_string(),
        };
        let rotated = manager
            .rotate_if_needed(&mut state, &provider, &SummaryParams::default())
            .await;
        assert!(!rotated);
        assert_eq!(state.message_count(), 13);
        assert!(state.summary.is_none());
    }

    #[tokio::test]
    async fn test_rotation_sets_summary_and_trims() {
        let manager = manager();
        let mut state = filled_state(14);
        let provider = FixedSummaryProvider {
            summary: "- user weighs 82 kg\n- goal: 78 kg".to_string(),
        };
        let rotated = manager
            .rotate_if_needed(&mut state, &provider, &SummaryParams::default())
            .await;
        assert!(rotated);
        assert_eq!(state.message_count(), 8);
        assert_eq!(
            state.summary.as_deref(),
            Some("- user weighs 82 kg\n- goal: 78 kg")
        );
        // Most recent messages survive.
        assert_eq!(state.messages[7].content, "message 13");
    }

    #[tokio::test]
    async fn test_failed_summary_keeps_prior_and_still_trims() {
        let manager = manager();
        let mut state = filled_state(15);
        state.summary = Some("- earlier bullet".to_string());
        let rotated = manager
            .rotate_if_needed(&mut state, &FailingProvider, &SummaryParams::default())
            .await;
        assert!(rotated);
        assert_eq!(state.summary.as_deref(), Some("- earlier bullet"));
        assert_eq!(state.message_count(), 8);
    }

    #[tokio::test]
    async fn test_empty_summary_keeps_prior() {
        let manager = manager();
        let mut state = filled_state(14);
        state.summary = Some("- earlier bullet".to_string());
        let provider = FixedSummaryProvider {
            summary: "   ".to_string(),
        };
        manager
            .rotate_if_needed(&mut state, &provider, &SummaryParams::default())
            .await;
        assert_eq!(state.summary.as_deref(), Some("- earlier bullet"));
    }
}
