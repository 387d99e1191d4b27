pub mod callbacks;
mod error;
mod llm;
mod retry;
mod value;

pub use callbacks::{
    ensure_object, CallbackHandler, CallbackManager, LlmInput, LlmResult, RunContext, RunType,
    TokenUsage,
};
pub use error::ReactantError;
pub use llm::{Llm, LlmRequest, LlmResponse};
pub use retry::{is_retryable, Retrying};
pub use value::Value;
