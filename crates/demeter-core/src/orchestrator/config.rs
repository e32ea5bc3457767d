//! Orchestrator configuration

use crate::memory::MemoryConfig;

/// Tunable parameters for turn processing
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Model identifier passed to the provider
    pub model: String,
    /// Sampling temperature for the main reply
    pub temperature: f32,
    /// Nucleus sampling threshold, provider default when unset
    pub top_p: Option<f32>,
    /// Token cap for the main reply
    pub max_tokens: u32,
    /// Maximum model round-trips per turn before giving up
    pub max_rounds: usize,
    /// Model for summarization, falls back to `model` when unset
    pub summary_model: Option<String>,
    /// Sampling temperature for summarization, kept low for faithful compression
    pub summary_temperature: f32,
    /// Token cap for the summary
    pub summary_max_tokens: u32,
    /// Conversation memory sizing
    pub memory: MemoryConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.6,
            top_p: None,
            max_tokens: 1024,
            max_rounds: 4,
            summary_model: None,
            summary_temperature: 0.2,
            summary_max_tokens: 256,
            memory: MemoryConfig::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Create with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the model identifier
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the nucleus sampling threshold
    #[must_use]
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = Some(top_p);
        self
    }

    /// Set the token cap
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the model round-trip limit
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Use a dedicated model for summarization
    #[must_use]
    pub fn with_summary_model(mut self, model: impl Into<String>) -> Self {
        self.summary_model = Some(model.into());
        self
    }

    /// Set the memory configuration
    #[must_use]
    pub fn with_memory(mut self, memory: MemoryConfig) -> Self {
        self.memory = memory;
        self
    }

    /// Resolved parameters for the summarization call
    #[must_use]
    pub fn summary_params(&self) -> crate::memory::SummaryParams {
        crate::memory::SummaryParams {
            model: self
                .summary_model
                .clone()
                .unwrap_or_else(|| self.model.clone()),
            temperature: self.summary_temperature,
            max_tokens: self.summary_max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_params_fall_back_to_main_model() {
        let config = OrchestratorConfig::default().with_model("demeter-chat");
        assert_eq!(config.summary_params().model, "demeter-chat");

        let config = config.with_summary_model("demeter-mini");
        assert_eq!(config.summary_params().model, "demeter-mini");
    }
}
