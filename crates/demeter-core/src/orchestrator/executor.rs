//! Traced function execution

use std::sync::Arc;
use std::time::Instant;

use demeter_tools::{FunctionRegistry, ToolContext, VisualizationPayload};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::types::{CallStatus, FunctionCallTrace};
use crate::error::Result;

/// Character cap for result previews in the trace
const RESULT_PREVIEW_MAX_CHARS: usize = 200;

/// Executes registry functions while recording a trace entry per call.
///
/// Every call gets an entry before dispatch, marked `Pending`, which is then
/// updated in place with the outcome. A turn that finishes cleanly therefore
/// never leaves a `Pending` entry behind.
pub struct TracedExecutor {
    registry: Arc<FunctionRegistry>,
    ctx: ToolContext,
    calls: Vec<FunctionCallTrace>,
    pending_visualizations: Vec<VisualizationPayload>,
}

impl TracedExecutor {
    /// Create an executor for one turn
    pub fn new(registry: Arc<FunctionRegistry>, ctx: ToolContext) -> Self {
        Self {
            registry,
            ctx,
            calls: Vec::new(),
            pending_visualizations: Vec::new(),
        }
    }

    /// Execute a function, recording the call in the trace.
    ///
    /// Errors are recorded in the trace entry and then propagated so the
    /// caller decides how to surface them.
    pub async fn execute(&mut self, name: &str, args: Value) -> Result<Value> {
        let index = self.calls.len();
        self.calls.push(FunctionCallTrace {
            name: name.to_string(),
            arguments: args.clone(),
            status: CallStatus::Pending,
            result_preview: None,
            visualization: None,
            debug: None,
        });

        let started = Instant::now();
        match self.registry.dispatch(name, args, &self.ctx).await {
            Ok(result) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let entry = &mut self.calls[index];
                entry.status = CallStatus::Ok;
                entry.result_preview = Some(preview(&result));
                entry.debug = Some(json!({ "duration_ms": elapsed_ms }));
                if let Some(payload) = extract_visualization(&result) {
                    entry.visualization = Some(payload.clone());
                    self.pending_visualizations.push(payload);
                }
                debug!(function = %name, duration_ms = elapsed_ms, "function call succeeded");
                Ok(result)
            }
            Err(e) => {
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let entry = &mut self.calls[index];
                entry.status = CallStatus::Error;
                let text = e.to_string();
                entry.result_preview = Some(if text.is_empty() {
                    "Unknown error".to_string()
                } else {
                    text
                });
                entry.debug = Some(json!({ "duration_ms": elapsed_ms }));
                warn!(function = %name, error = %e, "function call failed");
                Err(e.into())
            }
        }
    }

    /// The trace entries recorded so far
    #[must_use]
    pub fn calls(&self) -> &[FunctionCallTrace] {
        &self.calls
    }

    /// Consume the executor, yielding the trace and collected chart payloads
    #[must_use]
    pub fn into_parts(self) -> (Vec<FunctionCallTrace>, Vec<VisualizationPayload>) {
        (self.calls, self.pending_visualizations)
    }
}

/// Truncated, char-boundary-safe preview of a result value
fn preview(result: &Value) -> String {
    if result.is_null() {
        return "Empty result".to_string();
    }
    let serialized = result.to_string();
    if serialized.chars().count() <= RESULT_PREVIEW_MAX_CHARS {
        serialized
    } else {
        let truncated: String = serialized.chars().take(RESULT_PREVIEW_MAX_CHARS).collect();
        format!("{truncated}...")
    }
}

/// Pull a chart payload out of a result shaped like `{"visualization": {...}}`
fn extract_visualization(result: &Value) -> Option<VisualizationPayload> {
    let candidate = result.get("visualization")?;
    if candidate.get("type").and_then(Value::as_str).is_none() {
        return None;
    }
    serde_json::from_value(candidate.clone()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use demeter_tools::{Tool, ToolDefinition};

    struct EchoTool {
        definition: ToolDefinition,
    }

    impl EchoTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("echo", "Echoes its input"),
            }
        }
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _ctx: &ToolContext,
            input: Value,
        ) -> demeter_tools::Result<Value> {
            Ok(input)
        }
    }

    struct ChartTool {
        definition: ToolDefinition,
    }

    impl ChartTool {
        fn new() -> Self {
            Self {
                definition: ToolDefinition::new("chart", "Produces a chart payload"),
            }
        }
    }

    #[async_trait]
    impl Tool for ChartTool {
        fn definition(&self) -> &ToolDefinition {
            &self.definition
        }

        async fn execute(
            &self,
            _ctx: &ToolContext,
            _input: Value,
        ) -> demeter_tools::Result<Value> {
            Ok(json!({
                "found": true,
                "visualization": {
                    "type": "weight_trend",
                    "data": { "points": [] }
                }
            }))
        }
    }

    fn executor() -> TracedExecutor {
        let mut registry = FunctionRegistry::new();
        registry.register(Arc::new(EchoTool::new()));
        registry.register(Arc::new(ChartTool::new()));
        TracedExecutor::new(Arc::new(registry), ToolContext::new("u1"))
    }

    #[tokio::test]
    async fn test_success_records_ok_entry() {
        let mut executor = executor();
        let result = executor
            .execute("echo", json!({"value": 42}))
            .await
            .unwrap();
        assert_eq!(result, json!({"value": 42}));

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].status, CallStatus::Ok);
        assert_eq!(calls[0].result_preview.as_deref(), Some("{\"value\":42}"));
        assert!(calls[0].debug.as_ref().unwrap().get("duration_ms").is_some());
    }

    #[tokio::test]
    async fn test_unknown_function_records_error_entry() {
        let mut executor = executor();
        let err = executor.execute("missing", json!({})).await.unwrap_err();
        assert!(err.to_string().contains("missing"));

        let calls = executor.calls();
        assert_eq!(calls[0].status, CallStatus::Error);
        assert!(calls[0]
            .result_preview
            .as_deref()
            .unwrap()
            .contains("missing"));
    }

    #[tokio::test]
    async fn test_visualization_is_extracted() {
        let mut executor = executor();
        executor.execute("chart", json!({})).await.unwrap();

        let (calls, visualizations) = executor.into_parts();
        assert_eq!(visualizations.len(), 1);
        assert_eq!(calls[0].visualization.as_ref().unwrap().kind.as_str(), "weight_trend");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long: String = "é".repeat(300);
        let text = preview(&Value::String(long));
        assert!(text.ends_with("..."));
        assert_eq!(text.chars().count(), RESULT_PREVIEW_MAX_CHARS + 3);
    }

    #[test]
    fn test_preview_of_null() {
        assert_eq!(preview(&Value::Null), "Empty result");
    }
}
