use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReactantError {
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("LLM provider rate limited the request: {0}")]
    RateLimited(String),
    #[error("LLM provider rejected the credentials: {0}")]
    Authentication(String),
    #[error("LLM provider rejected the request: {0}")]
    InvalidRequest(String),
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Max retries ({max}) exceeded, last error: {last}")]
    MaxRetriesExceeded { max: usize, last: String },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
