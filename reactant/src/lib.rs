//! Rust-native ReAct agents.
//!
//! This crate bundles the workspace behind feature flags. `openai` pulls in the
//! chat completions client and `agent` the ReAct loop; both are on by default.

pub use reactant_core::*;

pub mod prompt {
    pub use reactant_prompt::*;
}

#[cfg(feature = "openai")]
pub mod llm {
    pub use reactant_llm::*;
}

#[cfg(feature = "agent")]
pub mod agent {
    pub use reactant_agent::*;
}

pub mod prelude {
    pub use reactant_core::{
        CallbackHandler, CallbackManager, Llm, LlmRequest, LlmResponse, ReactantError, Retrying,
    };
    pub use reactant_prompt::PromptTemplate;

    #[cfg(feature = "agent")]
    pub use reactant_agent::{
        AgentConfig, AgentError, AgentExecutor, AgentRun, CancellationToken,
        ConsoleCallbackHandler, Tool, ToolRegistry,
    };

    #[cfg(feature = "openai")]
    pub use reactant_llm::{OpenAiClient, OpenAiConfig};
}
