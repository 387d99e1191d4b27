mod client;
mod config;
pub mod openai_compatible;

pub use client::{truncate_at_stop, OpenAiClient};
pub use config::{OpenAiConfig, OpenAiConfigBuilder};
pub use reactant_core::{Llm, LlmRequest, LlmResponse};
