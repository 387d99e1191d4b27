//! Structured types for LLM observability.
//!
//! These capture what a model call was asked and what it produced, so a
//! handler can print or export the exchange without knowing the provider.

/// Token consumption reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// LLM call parameters captured at start time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LlmInput {
    pub model: String,
    /// Rendered prompt (after template expansion), not the template itself
    pub prompt: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop_sequences: Vec<String>,
}

impl From<&crate::LlmRequest> for LlmInput {
    fn from(request: &crate::LlmRequest) -> Self {
        Self {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stop_sequences: request.stop.clone(),
        }
    }
}

/// LLM call results captured at end time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LlmResult {
    pub token_usage: Option<TokenUsage>,
    pub model: String,
    pub finish_reason: Option<String>,
    /// Raw completion text, before any parsing
    pub generations: Vec<String>,
}

impl LlmResult {
    pub fn from_response(model: impl Into<String>, response: &crate::LlmResponse) -> Self {
        Self {
            token_usage: response.usage.clone(),
            model: model.into(),
            finish_reason: response.finish_reason.clone(),
            generations: vec![response.text.clone()],
        }
    }

    /// The first generation, or an empty string when the provider returned none.
    pub fn text(&self) -> &str {
        self.generations.first().map(String::as_str).unwrap_or("")
    }
}
