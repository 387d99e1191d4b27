use std::time::Duration;

pub const DEFAULT_MAX_STEPS: usize = 15;
pub const OBSERVATION_STOP: &str = "\nObservation";

/// Knobs for one agent. An empty `model` defers to the client's default.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub model: String,
    pub max_steps: usize,
    pub stop: Vec<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub model_timeout: Option<Duration>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            max_steps: DEFAULT_MAX_STEPS,
            stop: vec![OBSERVATION_STOP.to_string()],
            temperature: Some(0.0),
            max_tokens: None,
            model_timeout: None,
        }
    }
}

impl AgentConfig {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_model_timeout(mut self, timeout: Duration) -> Self {
        self.model_timeout = Some(timeout);
        self
    }
}
