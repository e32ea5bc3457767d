//! Health metrics lookup

use crate::error::{Error, Result};
use crate::registry::{Tool, ToolContext, ToolDefinition};
use crate::services::{MetricKind, ProfileService, TimePeriod};
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct HealthMetricsArgs {
    metric_type: String,
    /// Present on combined multi-metric calls
    #[serde(default)]
    metrics: Option<Vec<String>>,
    #[serde(default)]
    time_period: Option<TimePeriod>,
}

/// `get_health_metrics` - current values and history for the user's metrics
pub struct HealthMetricsTool {
    definition: ToolDefinition,
    profile: Arc<dyn ProfileService>,
}

impl HealthMetricsTool {
    /// Create the tool over a profile service
    #[must_use]
    pub fn new(profile: Arc<dyn ProfileService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_health_metrics",
                "Look up the user's recorded health metrics (weight, height, bmi, wellness). \
                 Supports a single metric or a combined multi-metric lookup, optionally over \
                 a time period.",
            )
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": {
                    "metric_type": {
                        "type": "string",
                        "enum": ["weight", "height", "bmi", "wellness"],
                        "description": "Primary metric to look up"
                    },
                    "metrics": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "All metrics for a combined lookup"
                    },
                    "time_period": {
                        "type": "string",
                        "enum": ["current", "7d", "30d", "90d"],
                        "description": "History window, defaults to current"
                    }
                },
                "required": ["metric_type"]
            })),
            profile,
        }
    }
}

#[async_trait::async_trait]
impl Tool for HealthMetricsTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let args: HealthMetricsArgs =
            serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;

        // Combined calls carry the full metric list; single calls just metric_type.
        let requested: Vec<String> = args
            .metrics
            .unwrap_or_else(|| vec![args.metric_type.clone()]);

        let mut kinds: Vec<MetricKind> = Vec::new();
        for name in &requested {
            let kind = MetricKind::parse(name)
                .ok_or_else(|| Error::InvalidInput(format!("unknown metric: {name}")))?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        let period = args.time_period.unwrap_or_default();
        debug!(user = %ctx.user_id, metrics = ?kinds, period = %period.as_str(), "Fetching health metrics");

        let Some(snapshot) = self.profile.load_profile_snapshot(&ctx.user_id).await? else {
            return Ok(serde_json::json!({
                "found": false,
                "message": "No profile data recorded for this user yet"
            }));
        };

        let mut metrics = serde_json::Map::new();
        for kind in &kinds {
            let mut entry = serde_json::Map::new();
            match snapshot.current_value(*kind) {
                Some(value) => {
                    entry.insert("value".to_string(), serde_json::json!(value));
                    entry.insert("unit".to_string(), serde_json::json!(kind.unit()));
                }
                None => {
                    entry.insert("value".to_string(), serde_json::Value::Null);
                }
            }
            if period != TimePeriod::Current {
                let history: Vec<serde_json::Value> = snapshot
                    .history_for(*kind, period)
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "recorded_at": p.recorded_at.to_rfc3339(),
                            "value": p.value
                        })
                    })
                    .collect();
                entry.insert("history".to_string(), serde_json::json!(history));
            }
            metrics.insert(kind.as_str().to_string(), serde_json::Value::Object(entry));
        }

        Ok(serde_json::json!({
            "found": true,
            "time_period": period.as_str(),
            "metrics": metrics
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ProfileSnapshot;

    struct FakeProfile {
        snapshot: Option<ProfileSnapshot>,
    }

    #[async_trait::async_trait]
    impl ProfileService for FakeProfile {
        async fn load_profile_snapshot(&self, _user_id: &str) -> Result<Option<ProfileSnapshot>> {
            Ok(self.snapshot.clone())
        }

        async fn goal_progress(
            &self,
            _user_id: &str,
        ) -> Result<Option<crate::services::GoalProgress>> {
            Ok(None)
        }
    }

    fn snapshot() -> ProfileSnapshot {
        ProfileSnapshot {
            user_id: "u1".to_string(),
            weight_kg: Some(82.5),
            height_cm: Some(178.0),
            bmi: Some(26.0),
            wellness_score: Some(71.0),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_combined_multi_metric_lookup() {
        let tool = HealthMetricsTool::new(Arc::new(FakeProfile {
            snapshot: Some(snapshot()),
        }));
        let ctx = ToolContext::new("u1");

        let out = tool
            .execute(
                &ctx,
                serde_json::json!({
                    "metric_type": "weight",
                    "metrics": ["weight", "bmi"],
                    "time_period": "current"
                }),
            )
            .await
            .unwrap();

        assert_eq!(out["found"], true);
        assert_eq!(out["time_period"], "current");
        assert_eq!(out["metrics"]["weight"]["value"], 82.5);
        assert_eq!(out["metrics"]["bmi"]["value"], 26.0);
        assert!(out["metrics"]["weight"].get("history").is_none());
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let tool = HealthMetricsTool::new(Arc::new(FakeProfile { snapshot: None }));
        let ctx = ToolContext::new("u1");
        let out = tool
            .execute(&ctx, serde_json::json!({"metric_type": "weight"}))
            .await
            .unwrap();
        assert_eq!(out["found"], false);
    }

    #[tokio::test]
    async fn test_unknown_metric_rejected() {
        let tool = HealthMetricsTool::new(Arc::new(FakeProfile {
            snapshot: Some(snapshot()),
        }));
        let ctx = ToolContext::new("u1");
        let err = tool
            .execute(&ctx, serde_json::json!({"metric_type": "steps"}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
