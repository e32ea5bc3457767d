//! Meal plan and recipe lookups

use crate::error::{Error, Result};
use crate::registry::{Tool, ToolContext, ToolDefinition};
use crate::services::MealPlanService;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

/// `get_meal_plan` - the user's active meal plan
pub struct MealPlanTool {
    definition: ToolDefinition,
    meal_plans: Arc<dyn MealPlanService>,
}

impl MealPlanTool {
    /// Create the tool over a meal plan service
    #[must_use]
    pub fn new(meal_plans: Arc<dyn MealPlanService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_meal_plan",
                "Look up the user's active meal plan with its planned meals.",
            ),
            meal_plans,
        }
    }
}

#[async_trait::async_trait]
impl Tool for MealPlanTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        _input: serde_json::Value,
    ) -> Result<serde_json::Value> {
        debug!(user = %ctx.user_id, "Fetching meal plan");

        let Some(plan) = self.meal_plans.load_meal_plan(&ctx.user_id).await? else {
            return Ok(serde_json::json!({
                "found": false,
                "message": "No active meal plan for this user"
            }));
        };

        Ok(serde_json::json!({
            "found": true,
            "plan": plan
        }))
    }
}

#[derive(Debug, Deserialize)]
struct RecipeArgs {
    recipe_id: String,
}

/// `get_recipe` - recipe lookup by id
pub struct RecipeTool {
    definition: ToolDefinition,
    meal_plans: Arc<dyn MealPlanService>,
}

impl RecipeTool {
    /// Create the tool over a meal plan service
    #[must_use]
    pub fn new(meal_plans: Arc<dyn MealPlanService>) -> Self {
        Self {
            definition: ToolDefinition::new(
                "get_recipe",
                "Look up one recipe by id, including per-serving nutrition values.",
            )
            .with_parameters(serde_json::json!({
                "type": "object",
                "properties": {
                    "recipe_id": {"type": "string"}
                },
                "required": ["recipe_id"]
            })),
            meal_plans,
        }
    }
}

#[async_trait::async_trait]
impl Tool for RecipeTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(
        &self,
        ctx: &ToolContext,
        input: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let args: RecipeArgs =
            serde_json::from_value(input).map_err(|e| Error::InvalidInput(e.to_string()))?;
        debug!(user = %ctx.user_id, recipe = %args.recipe_id, "Fetching recipe");

        let Some(recipe) = self.meal_plans.recipe(&args.recipe_id).await? else {
            return Ok(serde_json::json!({
                "found": false,
                "message": format!("No recipe with id {}", args.recipe_id)
            }));
        };

        Ok(serde_json::json!({
            "found": true,
            "recipe": recipe
        }))
    }
}
