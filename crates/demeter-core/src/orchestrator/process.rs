//! The turn processing loop

use std::sync::Arc;

use demeter_llm::{
    CompletionRequest, LlmProvider, Message, ToolCall, ToolChoice, ToolCompletionRequest,
};
use demeter_tools::{FunctionRegistry, ToolContext};
use serde_json::{json, Value};
use tracing::{debug, info, instrument, warn};

use super::config::OrchestratorConfig;
use super::executor::TracedExecutor;
use super::prefetch::{detect_intents, Intent, ResponseMode};
use super::prompts::{system_prompt, CONCISE_INSTRUCTION, DETAILED_INSTRUCTION, FEW_SHOT};
use super::sanitize::sanitize_response;
use super::types::{TurnRequest, TurnResult, TurnTrace};
use crate::error::{Error, Result};
use crate::memory::{
    ChatRole, ConversationMessage, ConversationStore, MemoryManager, MessageMetadata,
};

/// Drives a full conversational turn: prefetch, model rounds, sanitization,
/// and memory updates.
pub struct Orchestrator {
    registry: Arc<FunctionRegistry>,
    provider: Arc<dyn LlmProvider>,
    memory: MemoryManager,
    config: OrchestratorConfig,
}

impl Orchestrator {
    /// Create an orchestrator
    pub fn new(
        registry: Arc<FunctionRegistry>,
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn ConversationStore>,
        config: OrchestratorConfig,
    ) -> Self {
        let memory = MemoryManager::new(store, config.memory.clone());
        Self {
            registry,
            provider,
            memory,
            config,
        }
    }

    /// Process one turn for a user.
    ///
    /// Validation happens before any state is touched, so a rejected request
    /// leaves no trace and writes nothing. Store save failures after a
    /// completed turn are logged and swallowed; the user still gets their
    /// reply.
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn run_turn(&self, request: TurnRequest) -> Result<TurnResult> {
        let text = request.message.trim();
        if text.is_empty() {
            return Err(Error::Validation("message must not be empty".to_string()));
        }

        let mut state = self.memory.load_or_create(&request.user_id).await?;
        let mut executor = TracedExecutor::new(
            Arc::clone(&self.registry),
            ToolContext::new(&request.user_id),
        );

        let intents = detect_intents(text);
        let mode = intents.iter().find_map(|i| match i {
            Intent::Mode(mode) => Some(*mode),
            _ => None,
        });

        // Prefetched calls become synthetic tool exchanges in the prompt.
        let mut synthetic: Vec<Message> = Vec::new();
        for (i, intent) in intents.iter().enumerate() {
            let Some((name, args)) = intent.tool_call() else {
                continue;
            };
            match executor.execute(name, args.clone()).await {
                Ok(result) => {
                    let call_id = format!("prefetch_{i}");
                    synthetic.push(Message::assistant_with_tool_calls(
                        "",
                        vec![ToolCall {
                            id: call_id.clone(),
                            name: name.to_string(),
                            arguments: args.to_string(),
                        }],
                    ));
                    synthetic.push(Message::tool_response_named(
                        call_id,
                        name,
                        result.to_string(),
                    ));
                }
                Err(e) => {
                    warn!(function = %name, error = %e, "prefetch failed, leaving lookup to the model");
                }
            }
        }
        let prefetched = executor.calls().len();

        let mut messages = Vec::new();
        messages.push(Message::system(system_prompt(
            request.user_name.as_deref(),
            state.summary.as_deref(),
        )));
        for (question, reply) in FEW_SHOT {
            messages.push(Message::user(*question));
            messages.push(Message::assistant(*reply));
        }
        for stored in state.context_window(self.config.memory.context_window) {
            messages.push(match stored.role {
                ChatRole::User => Message::user(&stored.content),
                ChatRole::Assistant => Message::assistant(&stored.content),
            });
        }
        messages.extend(synthetic);
        match mode {
            Some(ResponseMode::Concise) => messages.push(Message::system(CONCISE_INSTRUCTION)),
            Some(ResponseMode::Detailed) => messages.push(Message::system(DETAILED_INSTRUCTION)),
            None => {}
        }
        messages.push(Message::user(text));

        let raw_reply = self.invoke_model(messages, &mut executor).await?;
        let reply = sanitize_response(&raw_reply);

        let (function_calls, visualizations) = executor.into_parts();
        let rounds = function_calls.len().saturating_sub(prefetched);
        let topics = topics_for(&function_calls);

        let assistant_message = ConversationMessage::assistant(&reply).with_metadata(
            MessageMetadata {
                visualizations,
                topics: topics.clone(),
            },
        );

        state.push(ConversationMessage::user(text));
        state.push(assistant_message.clone());
        state.merge_topics(&topics);

        let rotated = self
            .memory
            .rotate_if_needed(
                &mut state,
                self.provider.as_ref(),
                &self.config.summary_params(),
            )
            .await;

        if let Err(e) = self.memory.save(&state).await {
            warn!(user_id = %state.user_id, error = %e, "failed to persist conversation");
        }

        let trace = TurnTrace {
            request: text.to_string(),
            user_display_name: request.user_name.clone(),
            response_plan: format!(
                "{prefetched} prefetched call(s), {rounds} model-driven call(s)"
            ),
            function_calls,
        };

        let preview: String = reply
            .char_indices()
            .take_while(|(i, _)| *i < 120)
            .map(|(_, c)| c)
            .collect();
        info!(
            user_id = %state.user_id,
            calls = trace.function_calls.len(),
            rotated = rotated,
            response_preview = %preview,
            "turn completed"
        );

        Ok(TurnResult {
            summary: state.summary.clone(),
            message: assistant_message,
            messages: state.messages,
            trace,
        })
    }

    /// Run model rounds until the model stops asking for functions.
    ///
    /// Model-requested calls that fail are fed back as error tool results so
    /// the model can recover or explain. The final round disallows tools to
    /// push the model toward a text answer. Hitting the round limit falls
    /// back to the last text the model produced alongside its calls; only a
    /// turn with no text at all maps to the provider-exhausted error.
    async fn invoke_model(
        &self,
        mut messages: Vec<Message>,
        executor: &mut TracedExecutor,
    ) -> Result<String> {
        if !self.provider.supports_tools() {
            return Err(Error::Llm(demeter_llm::Error::NotConfigured(
                "provider does not support function calling".to_string(),
            )));
        }

        let tools = self.registry.to_llm_tools();
        let mut last_content: Option<String> = None;

        for round in 0..self.config.max_rounds {
            let mut request = CompletionRequest::new(&self.config.model)
                .with_messages(messages.clone())
                .with_temperature(self.config.temperature)
                .with_max_tokens(self.config.max_tokens);
            if let Some(top_p) = self.config.top_p {
                request = request.with_top_p(top_p);
            }
            let mut tool_request = ToolCompletionRequest::new(request, tools.clone());
            if round + 1 == self.config.max_rounds {
                tool_request = tool_request.with_tool_choice(ToolChoice::None);
            }
            let response = self.provider.complete_with_tools(tool_request).await?;

            let content = response.content.clone().unwrap_or_default();
            if !content.trim().is_empty() {
                last_content = Some(content.clone());
            }
            if !response.has_tool_calls() {
                return Ok(content);
            }

            debug!(
                round = round,
                calls = response.tool_calls.len(),
                "model requested function calls"
            );
            messages.push(Message::assistant_with_tool_calls(
                content,
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let args: Value = call.parse_arguments().unwrap_or_else(|e| {
                    warn!(function = %call.name, error = %e, "unparseable arguments, using empty object");
                    json!({})
                });
                let content = match executor.execute(&call.name, args).await {
                    Ok(result) => result.to_string(),
                    Err(e) => json!({ "error": e.to_string() }).to_string(),
                };
                messages.push(Message::tool_response_named(
                    call.id.clone(),
                    call.name.clone(),
                    content,
                ));
            }
        }

        match last_content {
            Some(content) => {
                warn!(
                    rounds = self.config.max_rounds,
                    "round limit reached, answering with the last text produced"
                );
                Ok(content)
            }
            None => Err(Error::Llm(demeter_llm::Error::Exhausted(
                self.config.max_rounds,
            ))),
        }
    }
}

/// Topic tags derived from the functions a turn actually called
fn topics_for(calls: &[super::types::FunctionCallTrace]) -> Vec<String> {
    let mut topics = Vec::new();
    for call in calls {
        let topic = match call.name.as_str() {
            "get_health_metrics" => "metrics",
            "get_goal_progress" => "goals",
            "generate_visualization" => "visualization",
            "get_meal_plan" | "get_recipe" => "meals",
            "get_nutrition_log" => "nutrition",
            _ => continue,
        };
        if !topics.iter().any(|t| t == topic) {
            topics.push(topic.to_string());
        }
    }
    topics
}
