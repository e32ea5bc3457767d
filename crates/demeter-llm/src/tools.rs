//! Function-calling wire types.
//!
//! The orchestrator advertises registry functions as [`ToolDefinition`]s and
//! gets [`ToolCall`]s back; `arguments` stays a raw JSON string until
//! [`ToolCall::parse_arguments`] decodes it, so a model that emits malformed
//! JSON surfaces as an [`Error::InvalidResponse`] instead of a silent drop.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A function the model may call, JSON-schema parameters included
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Function name as the model will reference it
    pub name: String,
    /// What the function does, shown to the model
    pub description: String,
    /// JSON schema for the arguments
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a definition
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// One function call requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Call id, echoed back on the matching tool-result message
    pub id: String,
    /// Function name
    pub name: String,
    /// Arguments as the raw JSON string the model produced
    pub arguments: String,
}

impl ToolCall {
    /// Decode the arguments into a typed value
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.arguments).map_err(|e| Error::InvalidResponse(e.to_string()))
    }
}

/// Whether the model may call functions on a given round.
///
/// The orchestrator runs `Auto` while rounds remain and switches to `None`
/// on the final round to force a text answer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// The model decides
    #[default]
    Auto,
    /// Function calling disabled for this round
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_definition_carries_schema() {
        let tool = ToolDefinition::new(
            "get_nutrition_log",
            "Recent daily nutrition totals",
            serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": {"type": "integer"}
                },
                "required": []
            }),
        );

        assert_eq!(tool.name, "get_nutrition_log");
        assert_eq!(tool.parameters["properties"]["limit"]["type"], "integer");
    }

    #[test]
    fn test_parse_arguments_typed() {
        #[derive(Deserialize)]
        struct Args {
            metric_type: String,
            metrics: Vec<String>,
        }

        let call = ToolCall {
            id: "call_0".to_string(),
            name: "get_health_metrics".to_string(),
            arguments: r#"{"metric_type": "weight", "metrics": ["weight", "bmi"]}"#.to_string(),
        };

        let args: Args = call.parse_arguments().unwrap();
        assert_eq!(args.metric_type, "weight");
        assert_eq!(args.metrics, vec!["weight", "bmi"]);
    }

    #[test]
    fn test_parse_arguments_malformed_is_invalid_response() {
        let call = ToolCall {
            id: "call_0".to_string(),
            name: "get_health_metrics".to_string(),
            arguments: "{not json".to_string(),
        };
        let parsed: Result<serde_json::Value> = call.parse_arguments();
        assert!(matches!(parsed, Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_tool_choice_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ToolChoice::Auto).unwrap(),
            serde_json::json!("auto")
        );
        assert_eq!(
            serde_json::to_value(ToolChoice::None).unwrap(),
            serde_json::json!("none")
        );
    }
}
