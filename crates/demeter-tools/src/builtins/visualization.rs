//! Visualization builder bridge

use crate::error::{Error, Result};
use crate::registry::{Tool, ToolContext, ToolDefinition};
use crate::services::{VisualizationRequest, VisualizationService};
use std::sync::Arc;
use tracing::debug;

/// `generate_visualization` - build a chart-ready payload for the user.
///
/// The payload is embedded under a `visualization` key so the traced
/// executor can detect and forward it to the assistant message metadata.
pub struct VisualizationTool {
    definition: ToolDefinition,
    visualizations: Arc<dyn VisualizationService>,
}

impl VisualizationTool {
    /// Create the tool over a visualization builder
    #[must_use]
    pub fn new(visualizations: Arc<dyn VisualizationService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "generate_visualization",
                "Build a chart of the user's data (weight trend, protein vs target, \
                 macro breakdown, sleep trend), optionally over a time period.",
            )
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": {
                    "visualization_type": {
                        "type": "string",
                        "enum": ["weight_trend", "protein_vs_target", "macro_breakdown", "sleep_trend"]
                    },
                    "time_period": {
                        "type": "string",
                        "enum": ["7d", "30d", "90d"]
                    }
                },
                "required": ["visualization_type"]
            })),
            visualizations,
        }
    }
}

#[async_trait::async_trait]
impl Tool for VisualizationTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let request: VisualizationRequest =
            serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        debug!(user = %ctx.user_id, kind = %request.kind.as_str(), "Building visualization");

        let Some(payload) = self.visualizations.build(&ctx.user_id, request).await? else {
            return Ok(serde_json::json!({
                "found": false,
                "message": "No data available to chart"
            }));
        };

        Ok(serde_json::json!({
            "found": true,
            "visualization": payload
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{TimePeriod, VisualizationKind, VisualizationPayload};

    struct FakeBuilder;

    #[async_trait::async_trait]
    impl VisualizationService for FakeBuilder {
        async fn build(
            &self,
            _user_id: &str,
            request: VisualizationRequest,
        ) -> Result<Option<VisualizationPayload>> {
            Ok(Some(VisualizationPayload {
                kind: request.kind.as_str().to_string(),
                data: serde_json::json!([{"date": "2026-08-22", "value": 131.0}]),
            }))
        }
    }

    #[tokio::test]
    async fn test_visualization_embeds_typed_payload() {
        let tool = VisualizationTool::new(Arc::new(FakeBuilder));
        let ctx = ToolContext::new("u1");
        let out = tool
            .execute(
                &ctx,
                serde_json::json!({
                    "visualization_type": "protein_vs_target",
                    "time_period": "7d"
                }),
            )
            .await
            .unwrap();

        assert_eq!(out["found"], true);
        assert_eq!(out["visualization"]["type"], "protein_vs_target");
        assert!(out["visualization"]["data"].is_array());
    }

    #[test]
    fn test_request_wire_format() {
        let request: VisualizationRequest = serde_json::from_value(serde_json::json!({
            "visualization_type": "weight_trend",
            "time_period": "30d"
        }))
        .unwrap();
        assert_eq!(request.kind, VisualizationKind::WeightTrend);
        assert_eq!(request.time_period, Some(TimePeriod::Days30));
    }
}
