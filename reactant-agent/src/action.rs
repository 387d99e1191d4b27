use serde::{Deserialize, Serialize};

/// The model's request to run `tool` with `tool_input`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// The full model output this action was parsed from.
    pub log: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentFinish {
    pub output: String,
    pub log: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentOutput {
    Action(AgentAction),
    Finish(AgentFinish),
}

/// One completed action and what the tool returned for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntermediateStep {
    pub action: AgentAction,
    pub observation: String,
}

impl IntermediateStep {
    pub fn new(action: AgentAction, observation: impl Into<String>) -> Self {
        Self {
            action,
            observation: observation.into(),
        }
    }
}
