//! Nutrition log lookup

use crate::error::{Error, Result};
use crate::registry::{Tool, ToolContext, ToolDefinition};
use crate::services::NutritionService;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_LIMIT: usize = 7;
const MAX_LIMIT: usize = 30;

#[derive(Debug, Deserialize)]
struct NutritionLogArgs {
    #[serde(default)]
    limit: Option<usize>,
}

/// `get_nutrition_log` - recent daily nutrition totals, newest first
pub struct NutritionLogTool {
    definition: ToolDefinition,
    nutrition: Arc<dyn NutritionService>,
}

impl NutritionLogTool {
    /// Create the tool over a nutrition service
    #[must_use]
    pub fn new(nutrition: Arc<dyn NutritionService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_nutrition_log",
                "Look up the user's most recent daily nutrition totals \
                 (calories, protein, carbs, fat).",
            )
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": {
                    "limit": {
                        "type": "integer",
                        "minimum": 1,
                        "maximum": MAX_LIMIT,
                        "description": "Days to return, defaults to 7"
                    }
                },
                "required": []
            })),
            nutrition,
        }
    }
}

#[async_trait::async_trait]
impl Tool for NutritionLogTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let args: NutritionLogArgs =
            serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        let limit = args.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        debug!(user = %ctx.user_id, limit, "Fetching nutrition log");

        let snapshots = self.nutrition.snapshots(&ctx.user_id, limit).await?;
        Ok(serde_json::json!({
            "found": !snapshots.is_empty(),
            "days": snapshots
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::NutritionSnapshot;
    use chrono::NaiveDate;

    struct FakeNutrition;

    #[async_trait::async_trait]
    impl NutritionService for FakeNutrition {
        async fn snapshots(
            &self,
            _user_id: &str,
            limit: usize,
        ) -> Result<Vec<NutritionSnapshot>> {
            let day = NutritionSnapshot {
                date: NaiveDate::from_ymd_opt(2026, 8, 28).unwrap(),
                calories: 2150.0,
                protein_g: 128.0,
                carbs_g: 240.0,
                fat_g: 70.0,
            };
            Ok(std::iter::repeat_with(|| day.clone()).take(limit.min(3)).collect())
        }
    }

    #[tokio::test]
    async fn test_default_limit() {
        let tool = NutritionLogTool::new(Arc::new(FakeNutrition));
        let ctx = ToolContext::new("u1");
        let out = tool.execute(&ctx, serde_json::json!({})).await.unwrap();
        assert_eq!(out["found"], true);
        assert_eq!(out["days"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_limit_clamped() {
        let tool = NutritionLogTool::new(Arc::new(FakeNutrition));
        let ctx = ToolContext::new("u1");
        // Over-large limits are clamped rather than rejected.
        let out = tool
            .execute(&ctx, serde_json::json!({"limit": 500}))
            .await
            .unwrap();
        assert!(out["days"].as_array().unwrap().len() <= MAX_LIMIT);
    }
}
