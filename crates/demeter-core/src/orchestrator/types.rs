//! Turn request, result, and trace types

use demeter_tools::VisualizationPayload;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::memory::ConversationMessage;

/// Incoming turn request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Conversation owner
    pub user_id: String,
    /// Display name used to address the user, if known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    /// The user's message text
    pub message: String,
}

impl TurnRequest {
    /// Create a request without a display name
    #[must_use]
    pub fn new(user_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            user_name: None,
            message: message.into(),
        }
    }

    /// Attach a display name
    #[must_use]
    pub fn with_user_name(mut self, name: impl Into<String>) -> Self {
        self.user_name = Some(name.into());
        self
    }
}

/// Lifecycle state of one traced function call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallStatus {
    /// Dispatched, outcome not yet recorded
    Pending,
    /// Completed successfully
    Ok,
    /// Failed with an error
    Error,
}

/// Record of one function call made during a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCallTrace {
    /// Function name
    pub name: String,
    /// Arguments as parsed JSON
    pub arguments: Value,
    /// Outcome
    pub status: CallStatus,
    /// Truncated preview of the result or error text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_preview: Option<String>,
    /// Chart payload extracted from the result, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visualization: Option<VisualizationPayload>,
    /// Timing and other diagnostic detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<Value>,
}

/// Full diagnostic trace for one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnTrace {
    /// The original request text
    pub request: String,
    /// Display name in effect for the turn
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_display_name: Option<String>,
    /// Short description of how the turn was handled
    pub response_plan: String,
    /// Every function call made, in execution order
    pub function_calls: Vec<FunctionCallTrace>,
}

/// Outcome of a completed turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnResult {
    /// Conversation summary after any rotation this turn triggered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// The assistant message produced this turn
    pub message: ConversationMessage,
    /// Retained conversation messages after the turn
    pub messages: Vec<ConversationMessage>,
    /// Diagnostic trace
    pub trace: TurnTrace,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_status_serializes_lowercase() {
        assert_eq!(serde_json::to_value(CallStatus::Ok).unwrap(), json!("ok"));
        assert_eq!(
            serde_json::to_value(CallStatus::Pending).unwrap(),
            json!("pending")
        );
        assert_eq!(
            serde_json::to_value(CallStatus::Error).unwrap(),
            json!("error")
        );
    }

    #[test]
    fn test_trace_omits_empty_fields() {
        let trace = FunctionCallTrace {
            name: "get_goal_progress".to_string(),
            arguments: json!({}),
            status: CallStatus::Pending,
            result_preview: None,
            visualization: None,
            debug: None,
        };
        let value = serde_json::to_value(&trace).unwrap();
        assert!(value.get("result_preview").is_none());
        assert!(value.get("visualization").is_none());
    }
}
