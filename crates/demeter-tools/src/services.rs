//! Collaborator service contracts
//!
//! The coaching core never computes nutrition or wellness values itself;
//! it reads them through these narrow async contracts. Hosts wire in real
//! backends, tests wire in scripted fakes.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Time period for metric history lookups
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    /// Latest value only
    #[default]
    #[serde(rename = "current")]
    Current,
    /// Last 7 days
    #[serde(rename = "7d")]
    Days7,
    /// Last 30 days
    #[serde(rename = "30d")]
    Days30,
    /// Last 90 days
    #[serde(rename = "90d")]
    Days90,
}

impl TimePeriod {
    /// Returns the wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Days7 => "7d",
            Self::Days30 => "30d",
            Self::Days90 => "90d",
        }
    }

    /// Number of days covered, `None` for a latest-value lookup
    #[must_use]
    pub fn days(&self) -> Option<i64> {
        match self {
            Self::Current => None,
            Self::Days7 => Some(7),
            Self::Days30 => Some(30),
            Self::Days90 => Some(90),
        }
    }
}

/// Normalized health metric identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    /// Body weight
    Weight,
    /// Height
    Height,
    /// Body mass index
    Bmi,
    /// Composite wellness score
    Wellness,
}

impl MetricKind {
    /// Returns the wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Height => "height",
            Self::Bmi => "bmi",
            Self::Wellness => "wellness",
        }
    }

    /// Unit the metric is reported in
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Weight => "kg",
            Self::Height => "cm",
            Self::Bmi => "kg/m2",
            Self::Wellness => "score",
        }
    }

    /// Parse a wire identifier
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "weight" => Some(Self::Weight),
            "height" => Some(Self::Height),
            "bmi" => Some(Self::Bmi),
            "wellness" => Some(Self::Wellness),
            _ => None,
        }
    }
}

/// One recorded metric value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricPoint {
    /// When the value was recorded
    pub recorded_at: DateTime<Utc>,
    /// Recorded value
    pub value: f64,
}

/// Normalized profile and metric snapshot for one user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    /// User this snapshot belongs to
    pub user_id: String,
    /// Latest body weight in kilograms
    pub weight_kg: Option<f64>,
    /// Height in centimeters
    pub height_cm: Option<f64>,
    /// Latest body mass index
    pub bmi: Option<f64>,
    /// Latest composite wellness score
    pub wellness_score: Option<f64>,
    /// Active goal descriptions
    #[serde(default)]
    pub goals: Vec<String>,
    /// Recorded history per metric, newest last
    #[serde(default)]
    pub history: HashMap<MetricKind, Vec<MetricPoint>>,
}

impl ProfileSnapshot {
    /// Latest value for a metric
    #[must_use]
    pub fn current_value(&self, metric: MetricKind) -> Option<f64> {
        match metric {
            MetricKind::Weight => self.weight_kg,
            MetricKind::Height => self.height_cm,
            MetricKind::Bmi => self.bmi,
            MetricKind::Wellness => self.wellness_score,
        }
    }

    /// History points for a metric recorded within the period
    #[must_use]
    pub fn history_for(&self, metric: MetricKind, period: TimePeriod) -> Vec<MetricPoint> {
        let Some(days) = period.days() else {
            return Vec::new();
        };
        let cutoff = Utc::now() - chrono::Duration::days(days);
        self.history
            .get(&metric)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.recorded_at >= cutoff)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Progress toward one goal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalStatus {
    /// Goal name
    pub name: String,
    /// Target value
    pub target: f64,
    /// Current value
    pub current: f64,
    /// Unit for target/current
    pub unit: String,
    /// Whether the user is on track
    pub on_track: bool,
}

/// Goal progress report for one user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalProgress {
    /// Per-goal status entries
    pub goals: Vec<GoalStatus>,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
}

/// One planned meal inside a meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedMeal {
    /// Meal slot (breakfast, lunch, ...)
    pub slot: String,
    /// Meal name
    pub name: String,
    /// Backing recipe, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe_id: Option<String>,
    /// Estimated calories
    pub calories: f64,
}

/// A user's active meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealPlan {
    /// Plan identifier
    pub id: String,
    /// Plan title
    pub title: String,
    /// Planned meals in day order
    pub meals: Vec<PlannedMeal>,
}

/// A recipe referenced from a meal plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe identifier
    pub id: String,
    /// Recipe name
    pub name: String,
    /// Servings the nutrition values refer to
    pub servings: u32,
    /// Calories per serving
    pub calories: f64,
    /// Protein grams per serving
    pub protein_g: f64,
    /// Carbohydrate grams per serving
    pub carbs_g: f64,
    /// Fat grams per serving
    pub fat_g: f64,
    /// Ingredient lines
    pub ingredients: Vec<String>,
}

/// One day's logged nutrition totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionSnapshot {
    /// Day the totals cover
    pub date: NaiveDate,
    /// Total calories
    pub calories: f64,
    /// Total protein grams
    pub protein_g: f64,
    /// Total carbohydrate grams
    pub carbs_g: f64,
    /// Total fat grams
    pub fat_g: f64,
}

/// Visualization sub-type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationKind {
    /// Weight over time
    #[default]
    WeightTrend,
    /// Protein intake against target
    ProteinVsTarget,
    /// Macro nutrient breakdown
    MacroBreakdown,
    /// Sleep duration over time
    SleepTrend,
}

impl VisualizationKind {
    /// Returns the wire representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WeightTrend => "weight_trend",
            Self::ProteinVsTarget => "protein_vs_target",
            Self::MacroBreakdown => "macro_breakdown",
            Self::SleepTrend => "sleep_trend",
        }
    }
}

/// Request for the visualization builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationRequest {
    /// Visualization sub-type
    #[serde(rename = "visualization_type")]
    pub kind: VisualizationKind,
    /// Optional time period, latest-period default is the builder's choice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_period: Option<TimePeriod>,
}

/// Opaque chart-ready payload produced by the visualization builder.
///
/// The core only detects its presence (a string `type` field) and forwards
/// it to the assistant message metadata; it never inspects `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisualizationPayload {
    /// Visualization type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Chart-ready rows
    pub data: serde_json::Value,
}

/// Profile and metrics lookup service
#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Load the normalized profile snapshot for a user
    async fn load_profile_snapshot(&self, user_id: &str) -> Result<Option<ProfileSnapshot>>;

    /// Generate the goal progress report for a user
    async fn goal_progress(&self, user_id: &str) -> Result<Option<GoalProgress>>;
}

/// Meal plan lookup service
#[async_trait]
pub trait MealPlanService: Send + Sync {
    /// Load the user's active meal plan
    async fn load_meal_plan(&self, user_id: &str) -> Result<Option<MealPlan>>;

    /// Look up a recipe by id
    async fn recipe(&self, recipe_id: &str) -> Result<Option<Recipe>>;
}

/// Nutrition log lookup service
#[async_trait]
pub trait NutritionService: Send + Sync {
    /// Most recent daily nutrition snapshots, newest first
    async fn snapshots(&self, user_id: &str, limit: usize) -> Result<Vec<NutritionSnapshot>>;
}

/// Visualization builder service
#[async_trait]
pub trait VisualizationService: Send + Sync {
    /// Build a chart-ready payload, `None` when there is no data to chart
    async fn build(
        &self,
        user_id: &str,
        request: VisualizationRequest,
    ) -> Result<Option<VisualizationPayload>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_period_wire_format() {
        assert_eq!(TimePeriod::Current.as_str(), "current");
        assert_eq!(TimePeriod::Days7.as_str(), "7d");
        assert_eq!(TimePeriod::Days30.as_str(), "30d");
        assert_eq!(TimePeriod::Days90.as_str(), "90d");

        let parsed: TimePeriod = serde_json::from_str("\"7d\"").unwrap();
        assert_eq!(parsed, TimePeriod::Days7);
    }

    #[test]
    fn test_metric_kind_parse() {
        assert_eq!(MetricKind::parse("WEIGHT"), Some(MetricKind::Weight));
        assert_eq!(MetricKind::parse("bmi"), Some(MetricKind::Bmi));
        assert_eq!(MetricKind::parse("steps"), None);
    }

    #[test]
    fn test_history_for_filters_by_cutoff() {
        let mut snapshot = ProfileSnapshot {
            user_id: "u1".to_string(),
            ..Default::default()
        };
        snapshot.history.insert(
            MetricKind::Weight,
            vec![
                MetricPoint {
                    recorded_at: Utc::now() - chrono::Duration::days(40),
                    value: 84.0,
                },
                MetricPoint {
                    recorded_at: Utc::now() - chrono::Duration::days(3),
                    value: 82.5,
                },
            ],
        );

        let week = snapshot.history_for(MetricKind::Weight, TimePeriod::Days7);
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].value, 82.5);

        let quarter = snapshot.history_for(MetricKind::Weight, TimePeriod::Days90);
        assert_eq!(quarter.len(), 2);

        assert!(snapshot
            .history_for(MetricKind::Weight, TimePeriod::Current)
            .is_empty());
    }

    #[test]
    fn test_visualization_payload_serializes_type_field() {
        let payload = VisualizationPayload {
            kind: "protein_vs_target".to_string(),
            data: serde_json::json!([{"date": "2026-08-22", "protein_g": 132.0}]),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["type"], "protein_vs_target");
    }
}
