use reactant_core::ReactantError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("tool not found: {name}. Available tools: [{}]", .available.join(", "))]
    ToolNotFound {
        name: String,
        available: Vec<String>,
    },
    #[error("could not parse model output: {reason}\nraw output: {raw}")]
    Parse { raw: String, reason: String },
    #[error("model invocation failed")]
    ModelInvocation(#[source] ReactantError),
    #[error("agent stopped after {max_steps} steps without a final answer")]
    MaxStepsExceeded { max_steps: usize },
    #[error("agent run was cancelled")]
    Cancelled,
    #[error("prompt rendering failed")]
    Prompt(#[source] ReactantError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("tool name must not be empty or whitespace: {name:?}")]
    InvalidName { name: String },
    #[error("duplicate tool name: {name}")]
    DuplicateTool { name: String },
}
