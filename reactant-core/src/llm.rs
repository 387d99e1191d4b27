use serde::{Deserialize, Serialize};

use crate::{ReactantError, TokenUsage};

/// A single text-completion call: one rendered prompt in, one completion out.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stop: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LlmResponse {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl LlmResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
            usage: None,
        }
    }
}

/// The model invocation boundary. Implementations are opaque remote calls;
/// transport, auth and rate-limit failures surface as [`ReactantError`].
#[async_trait::async_trait]
pub trait Llm: Send + Sync {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, ReactantError>;
}

#[async_trait::async_trait]
impl<L> Llm for std::sync::Arc<L>
where
    L: Llm + ?Sized,
{
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, ReactantError> {
        (**self).invoke(request).await
    }
}

#[async_trait::async_trait]
impl<L> Llm for Box<L>
where
    L: Llm + ?Sized,
{
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, ReactantError> {
        (**self).invoke(request).await
    }
}
