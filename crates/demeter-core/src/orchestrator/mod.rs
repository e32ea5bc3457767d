//! Turn orchestration: prefetch, model invocation, tool execution, sanitization

mod config;
mod executor;
mod prefetch;
mod process;
mod prompts;
mod sanitize;
mod types;

pub use config::OrchestratorConfig;
pub use executor::TracedExecutor;
pub use prefetch::{detect_intents, Intent, ResponseMode};
pub use process::Orchestrator;
pub use types::{CallStatus, FunctionCallTrace, TurnRequest, TurnResult, TurnTrace};
