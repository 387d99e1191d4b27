mod action;
mod config;
mod console;
mod error;
mod executor;
mod parser;
mod prompt;
mod registry;
mod scratchpad;
mod tool;

pub use action::{AgentAction, AgentFinish, AgentOutput, IntermediateStep};
pub use config::{AgentConfig, DEFAULT_MAX_STEPS, OBSERVATION_STOP};
pub use console::ConsoleCallbackHandler;
pub use error::{AgentError, RegistryError};
pub use executor::{AgentExecutor, AgentRun};
pub use parser::ReActOutputParser;
pub use prompt::{react_prompt, REACT_TEMPLATE};
pub use registry::ToolRegistry;
pub use scratchpad::format_log_to_str;
pub use tokio_util::sync::CancellationToken;
pub use tool::Tool;
