//! The "Fish" demo: one tool, one question, a printed trace.

use std::sync::Arc;

use reactant_agent::{
    AgentConfig, AgentError, AgentExecutor, AgentRun, ConsoleCallbackHandler, RegistryError,
    Tool, ToolRegistry,
};
use reactant_core::{CallbackManager, Llm};

pub const DEMO_QUESTION: &str = "How many characters in length are in the word: Fish?";

pub const MAX_STEPS_ENV: &str = "REACTANT_MAX_STEPS";
pub const RETRIES_ENV: &str = "REACTANT_RETRIES";
pub const DEFAULT_RETRIES: usize = 3;

pub fn get_text_length_tool() -> Tool {
    Tool::new(
        "get_text_length",
        "Returns the length of a text by character count.",
        |text| text.chars().count().to_string(),
    )
}

pub fn demo_registry() -> Result<ToolRegistry, RegistryError> {
    ToolRegistry::new().with_tool(get_text_length_tool())
}

/// Parses an optional numeric override, falling back to `default` when unset.
pub fn env_override<T>(var_name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(var_name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|err| anyhow::anyhow!("invalid {var_name} '{raw}': {err}")),
        Err(_) => Ok(default),
    }
}

/// Builds an executor over the demo tools that prints its trace through `console`.
pub fn demo_agent<L: Llm>(
    llm: L,
    config: AgentConfig,
    console: ConsoleCallbackHandler,
) -> Result<AgentExecutor<L>, RegistryError> {
    let callbacks = CallbackManager::new(vec![Arc::new(console)]);
    Ok(AgentExecutor::new(llm, demo_registry()?, config).with_callbacks(callbacks))
}

pub async fn run_demo<L: Llm>(agent: &AgentExecutor<L>) -> Result<AgentRun, AgentError> {
    println!("🚀 ReAct agent demo");
    println!("{}", "=".repeat(50));
    println!("📋 Registered tools: {:?}", agent.tools().names());
    println!("\n🤔 Processing sample question...");
    println!("Question: {DEMO_QUESTION}\n");

    let run = agent.run(DEMO_QUESTION).await?;

    println!("\n✅ Agent completed in {} steps", run.iterations);
    println!("Final answer: {}", run.output);
    Ok(run)
}
