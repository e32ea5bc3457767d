//! Goal progress lookup

use crate::error::Result;
use crate::registry::{Tool, ToolContext, ToolDefinition};
use crate::services::ProfileService;
use std::sync::Arc;
use tracing::debug;

/// `get_goal_progress` - progress report for the user's active goals
pub struct GoalProgressTool {
    definition: ToolDefinition,
    profile: Arc<dyn ProfileService>,
}

impl GoalProgressTool {
    /// Create the tool over a profile service
    #[must_use]
    pub fn new(profile: Arc<dyn ProfileService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_goal_progress",
                "Report the user's progress toward their active goals and milestones.",
            ),
            profile,
        }
    }
}

#[async_trait::async_trait]
impl Tool for GoalProgressTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        _input: serde_json::Value,
    ) -> Result<serde_json::Value> {
        debug!(user = %ctx.user_id, "Fetching goal progress");

        let Some(progress) = self.profile.goal_progress(&ctx.user_id).await? else {
            return Ok(serde_json::json!({
                "found": false,
                "message": "No goals configured for this user"
            }));
        };

        Ok(serde_json::json!({
            "found": true,
            "generated_at": progress.generated_at.to_rfc3339(),
            "goals": progress.goals
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GoalProgress, GoalStatus, ProfileSnapshot};
    use chrono::Utc;

    struct FakeProfile;

    #[async_trait::async_trait]
    impl ProfileService for FakeProfile {
        async fn load_profile_snapshot(&self, _user_id: &str) -> Result<Option<ProfileSnapshot>> {
            Ok(None)
        }

        async fn goal_progress(&self, _user_id: &str) -> Result<Option<GoalProgress>> {
            Ok(Some(GoalProgress {
                goals: vec![GoalStatus {
                    name: "Reach 80 kg".to_string(),
                    target: 80.0,
                    current: 82.5,
                    unit: "kg".to_string(),
                    on_track: true,
                }],
                generated_at: Utc::now(),
            }))
        }
    }

    #[tokio::test]
    async fn test_goal_progress_output() {
        let tool = GoalProgressTool::new(Arc::new(FakeProfile));
        let ctx = ToolContext::new("u1");
        let out = tool.execute(&ctx, serde_json::json!({})).await.unwrap();

        assert_eq!(out["found"], true);
        assert_eq!(out["goals"][0]["name"], "Reach 80 kg");
        assert_eq!(out["goals"][0]["on_track"], true);
    }
}
