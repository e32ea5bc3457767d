//! Builtins - the fixed function set exposed to the model
//!
//! - `get_health_metrics`: current values and history for weight/height/
//!   bmi/wellness, single- or multi-metric
//! - `get_goal_progress`: goal progress report
//! - `generate_visualization`: chart-ready payload from the builder
//! - `get_meal_plan` / `get_recipe`: meal plan lookups
//! - `get_nutrition_log`: recent daily nutrition totals

mod goal_progress;
mod health_metrics;
mod meal_plan;
mod nutrition_log;
mod visualization;

pub use goal_progress::GoalProgressTool;
pub use health_metrics::HealthMetricsTool;
pub use meal_plan::{MealPlanTool, RecipeTool};
pub use nutrition_log::NutritionLogTool;
pub use visualization::VisualizationTool;

use crate::registry::FunctionRegistry;
use crate::services::{MealPlanService, NutritionService, ProfileService, VisualizationService};
use std::sync::Arc;

/// Collaborator handles the builtin functions run against
#[derive(Clone)]
pub struct ServiceHandles {
    /// Profile and metrics lookups
    pub profile: Arc<dyn ProfileService>,
    /// Meal plan and recipe lookups
    pub meal_plans: Arc<dyn MealPlanService>,
    /// Nutrition log lookups
    pub nutrition: Arc<dyn NutritionService>,
    /// Visualization builder
    pub visualizations: Arc<dyn VisualizationService>,
}

/// Register all builtin functions with the registry
pub fn register_builtins(registry: &mut FunctionRegistry, services: &ServiceHandles) {
    registry.register(Arc::new(HealthMetricsTool::new(Arc::clone(
        &services.profile,
    ))));
    registry.register(Arc::new(GoalProgressTool::new(Arc::clone(
        &services.profile,
    ))));
    registry.register(Arc::new(VisualizationTool::new(Arc::clone(
        &services.visualizations,
    ))));
    registry.register(Arc::new(MealPlanTool::new(Arc::clone(
        &services.meal_plans,
    ))));
    registry.register(Arc::new(RecipeTool::new(Arc::clone(&services.meal_plans))));
    registry.register(Arc::new(NutritionLogTool::new(Arc::clone(
        &services.nutrition,
    ))));
}
