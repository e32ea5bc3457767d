//! Demeter Tools - Function registry and builtin handlers
//!
//! This crate provides the callable-function layer of the coaching core:
//! - Registry: name -> schema + handler mapping with string-key dispatch
//! - Services: narrow collaborator contracts (profile, meal plans,
//!   nutrition log, visualization builder) reached by the handlers
//! - Builtins: the fixed set of functions exposed to the model

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builtins;
pub mod error;
pub mod registry;
pub mod services;

pub use builtins::{register_builtins, ServiceHandles};
pub use error::{Error, Result};
pub use registry::{FunctionRegistry, Tool, ToolContext, ToolDefinition};
pub use services::{
    GoalProgress, GoalStatus, MealPlan, MealPlanService, MetricKind, MetricPoint,
    NutritionService, NutritionSnapshot, PlannedMeal, ProfileService, ProfileSnapshot, Recipe,
    TimePeriod, VisualizationKind, VisualizationPayload, VisualizationRequest,
    VisualizationService,
};
