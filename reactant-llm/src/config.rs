use std::time::Duration;

use reactant_core::ReactantError;
use secrecy::SecretString;
use url::Url;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";
pub const MODEL_ENV: &str = "OPENAI_MODEL";

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub base_url: Url,
    pub model: String,
    pub timeout: Duration,
}

impl OpenAiConfig {
    pub fn builder() -> OpenAiConfigBuilder {
        OpenAiConfigBuilder::default()
    }

    /// Reads `OPENAI_API_KEY` (required), `OPENAI_BASE_URL` and `OPENAI_MODEL`.
    pub fn from_env() -> Result<Self, ReactantError> {
        Self::builder()
            .api_key_from_env(API_KEY_ENV)
            .base_url_from_env(BASE_URL_ENV)
            .model_from_env(MODEL_ENV)
            .build()
    }

    pub fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.base_url.as_str().trim_end_matches('/')
        )
    }
}

#[derive(Default)]
pub struct OpenAiConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl OpenAiConfigBuilder {
    pub fn api_key(mut self, value: impl Into<String>) -> Self {
        self.api_key = Some(value.into());
        self
    }

    pub fn base_url(mut self, value: impl Into<String>) -> Self {
        self.base_url = Some(value.into());
        self
    }

    pub fn model(mut self, value: impl Into<String>) -> Self {
        self.model = Some(value.into());
        self
    }

    pub fn timeout(mut self, value: Duration) -> Self {
        self.timeout = Some(value);
        self
    }

    pub fn api_key_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.api_key = Some(value);
        }
        self
    }

    pub fn base_url_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.base_url = Some(value);
        }
        self
    }

    pub fn model_from_env(mut self, var_name: &str) -> Self {
        if let Ok(value) = std::env::var(var_name) {
            self.model = Some(value);
        }
        self
    }

    pub fn build(self) -> Result<OpenAiConfig, ReactantError> {
        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ReactantError::InvalidConfig(format!("api_key is required (set {API_KEY_ENV})"))
            })?;

        let raw_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&raw_url).map_err(|err| {
            ReactantError::InvalidConfig(format!("invalid base_url '{raw_url}': {err}"))
        })?;

        let model = self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string());
        if model.trim().is_empty() {
            return Err(ReactantError::InvalidConfig(
                "model must not be empty".to_string(),
            ));
        }

        Ok(OpenAiConfig {
            api_key: SecretString::new(api_key),
            base_url,
            model,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
        })
    }
}
