use reqwest::{Client, StatusCode};
use reactant_core::{Llm, LlmRequest, LlmResponse, ReactantError, TokenUsage};
use secrecy::ExposeSecret;

use crate::openai_compatible::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiError,
};
use crate::OpenAiConfig;

/// Text-completion client for any OpenAI-compatible chat endpoint.
///
/// The rendered prompt is sent as a single user message.
#[derive(Clone)]
pub struct OpenAiClient {
    config: OpenAiConfig,
    http: Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url.as_str())
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, ReactantError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| ReactantError::LlmProvider(err.to_string()))?;
        Ok(Self { config, http })
    }

    pub fn from_env() -> Result<Self, ReactantError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn map_transport_error(&self, err: reqwest::Error) -> ReactantError {
        if err.is_timeout() {
            ReactantError::Timeout(self.config.timeout)
        } else {
            ReactantError::LlmProvider(err.to_string())
        }
    }
}

fn map_status_error(status: StatusCode, body: &str) -> ReactantError {
    let message = serde_json::from_str::<OpenAiError>(body)
        .map(|err| err.error.message)
        .unwrap_or_else(|_| format!("HTTP {status}: {body}"));

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ReactantError::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => ReactantError::RateLimited(message),
        StatusCode::REQUEST_TIMEOUT => ReactantError::LlmProvider(message),
        // Other 4xx answers repeat identically on resend.
        status if status.is_client_error() => ReactantError::InvalidRequest(message),
        _ => ReactantError::LlmProvider(message),
    }
}

/// Cuts `text` at the earliest occurrence of any stop marker.
pub fn truncate_at_stop(text: &str, stop: &[String]) -> String {
    let cut = stop
        .iter()
        .filter(|marker| !marker.is_empty())
        .filter_map(|marker| text.find(marker.as_str()))
        .min()
        .unwrap_or(text.len());
    text[..cut].to_string()
}

#[async_trait::async_trait]
impl Llm for OpenAiClient {
    async fn invoke(&self, input: LlmRequest) -> Result<LlmResponse, ReactantError> {
        let LlmRequest {
            model,
            prompt,
            stop,
            temperature,
            max_tokens,
        } = input;
        let model = if model.is_empty() {
            self.config.model.clone()
        } else {
            model
        };
        let request = ChatCompletionRequest {
            model,
            messages: vec![ChatMessage::user(prompt)],
            stop: stop.clone(),
            temperature,
            max_tokens,
            stream: false,
        };

        tracing::debug!(model = %request.model, "sending chat completion request");
        let response = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = map_status_error(status, &body);
            tracing::warn!(%status, error = %error, "chat completion request failed");
            return Err(error);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let choice = body
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ReactantError::LlmProvider("no choices returned".to_string()))?;
        let content = choice.message.content.unwrap_or_default();

        Ok(LlmResponse {
            text: truncate_at_stop(&content, &stop),
            finish_reason: choice.finish_reason,
            usage: body.usage.map(|usage| TokenUsage {
                prompt_tokens: usage.prompt_tokens,
                completion_tokens: usage.completion_tokens,
                total_tokens: usage.total_tokens,
            }),
        })
    }
}
