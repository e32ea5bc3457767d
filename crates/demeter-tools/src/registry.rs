//! Registry - function registration and string-key dispatch
//!
//! Maps callable names to schemas and handlers. Registry contents are
//! fixed per deployment: everything is registered at startup and the set
//! never changes while the process runs. Handlers hold no mutable state
//! and are safe to call concurrently for different users.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Function metadata and parameter schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique function name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON schema for parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new definition with an empty object schema
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Set the parameters schema
    #[must_use]
    pub fn with_parameters(mut self, parameters: serde_json::Value) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Per-call context passed to every handler.
///
/// Always carries the caller's user identity; handlers must never fall
/// back to ambient state for it.
#[derive(Debug, Clone)]
pub struct ToolContext {
    /// User on whose behalf the call runs
    pub user_id: String,
}

impl ToolContext {
    /// Create a context for a user
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

/// Trait for function handlers
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the function definition
    fn definition(&self) -> &ToolDefinition;

    /// Execute the function with given input
    async fn execute(&self, ctx: &ToolContext, input: serde_json::Value)
        -> Result<serde_json::Value>;
}

/// Registry for managing callable functions
#[derive(Default)]
pub struct FunctionRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    definitions: HashMap<String, ToolDefinition>,
}

impl FunctionRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let def = tool.definition();
        let name = def.name.clone();
        debug!(function = %name, "Registering function");
        self.definitions.insert(name.clone(), def.clone());
        self.tools.insert(name, tool);
    }

    /// Get a handler by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a function exists
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all function definitions
    #[must_use]
    pub fn definitions(&self) -> Vec<&ToolDefinition> {
        self.definitions.values().collect()
    }

    /// Get function count
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Convert definitions to the LLM tool format
    #[must_use]
    pub fn to_llm_tools(&self) -> Vec<demeter_llm::ToolDefinition> {
        self.definitions()
            .into_iter()
            .map(|def| {
                demeter_llm::ToolDefinition::new(&def.name, &def.description, def.parameters.clone())
            })
            .collect()
    }

    /// Dispatch a call to the named function.
    ///
    /// Fails with `UnsupportedFunction` when the name is not registered.
    #[instrument(skip(self, args, ctx), fields(function = %name, user = %ctx.user_id))]
    pub async fn dispatch(
        &self,
        name: &str,
        args: serde_json::Value,
        ctx: &ToolContext,
    ) -> Result<serde_json::Value> {
        let tool = self
            .get(name)
            .ok_or_else(|| Error::UnsupportedFunction(name.to_string()))?;
        debug!("Dispatching function");
        tool.execute(ctx, args).await
    }
}
