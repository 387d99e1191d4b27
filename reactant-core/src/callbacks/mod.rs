use std::sync::Arc;
use std::time::{Instant, SystemTime};

use async_trait::async_trait;
use uuid::Uuid;

use crate::Value;

mod llm;

pub use llm::{LlmInput, LlmResult, TokenUsage};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunType {
    Agent,
    Chain,
    Llm,
    Tool,
}

#[derive(Clone, Debug)]
pub struct RunContext {
    pub run_id: Uuid,
    pub parent_run_id: Option<Uuid>,
    pub trace_id: Uuid,
    pub run_type: RunType,
    pub name: String,
    pub start_time: SystemTime,
    pub start_instant: Instant,
}

impl RunContext {
    pub fn root(run_type: RunType, name: String) -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            parent_run_id: None,
            trace_id: run_id,
            run_type,
            name,
            start_time: SystemTime::now(),
            start_instant: Instant::now(),
        }
    }

    pub fn child(&self, run_type: RunType, name: String) -> Self {
        let run_id = Uuid::new_v4();
        Self {
            run_id,
            parent_run_id: Some(self.run_id),
            trace_id: self.trace_id,
            run_type,
            name,
            start_time: SystemTime::now(),
            start_instant: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.start_instant.elapsed().as_millis()
    }
}

/// Observer of agent and model events.
///
/// Handlers run inline on the agent's thread of control and cannot fail;
/// whatever they do, the loop carries on unchanged.
#[async_trait]
pub trait CallbackHandler: Send + Sync {
    async fn on_start(&self, ctx: &RunContext, inputs: &Value);
    async fn on_end(&self, ctx: &RunContext, outputs: &Value, duration_ms: u128);
    async fn on_error(&self, ctx: &RunContext, error: &Value, duration_ms: u128);

    async fn on_llm_start(&self, ctx: &RunContext, input: &LlmInput) {
        let inputs = ensure_object(serde_json::to_value(input).unwrap_or(Value::Null));
        self.on_start(ctx, &inputs).await;
    }

    async fn on_llm_end(&self, ctx: &RunContext, result: &LlmResult, duration_ms: u128) {
        let outputs = ensure_object(serde_json::to_value(result).unwrap_or(Value::Null));
        self.on_end(ctx, &outputs, duration_ms).await;
    }

    async fn on_tool_start(&self, _ctx: &RunContext, _tool: &str, _input: &str) {}

    async fn on_tool_end(&self, _ctx: &RunContext, _observation: &str, _duration_ms: u128) {}
}

#[derive(Clone, Default)]
pub struct CallbackManager {
    handlers: Vec<Arc<dyn CallbackHandler>>,
}

impl std::fmt::Debug for CallbackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackManager")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl CallbackManager {
    pub fn new(handlers: Vec<Arc<dyn CallbackHandler>>) -> Self {
        Self { handlers }
    }

    pub fn noop() -> Self {
        Self { handlers: vec![] }
    }

    pub fn is_noop(&self) -> bool {
        self.handlers.is_empty()
    }

    pub async fn on_start(&self, ctx: &RunContext, inputs: &Value) {
        for handler in &self.handlers {
            handler.on_start(ctx, inputs).await;
        }
    }

    pub async fn on_end(&self, ctx: &RunContext, outputs: &Value, duration_ms: u128) {
        for handler in &self.handlers {
            handler.on_end(ctx, outputs, duration_ms).await;
        }
    }

    pub async fn on_error(&self, ctx: &RunContext, error: &Value, duration_ms: u128) {
        for handler in &self.handlers {
            handler.on_error(ctx, error, duration_ms).await;
        }
    }

    pub async fn on_llm_start(&self, ctx: &RunContext, input: &LlmInput) {
        for handler in &self.handlers {
            handler.on_llm_start(ctx, input).await;
        }
    }

    pub async fn on_llm_end(&self, ctx: &RunContext, result: &LlmResult, duration_ms: u128) {
        for handler in &self.handlers {
            handler.on_llm_end(ctx, result, duration_ms).await;
        }
    }

    pub async fn on_tool_start(&self, ctx: &RunContext, tool: &str, input: &str) {
        for handler in &self.handlers {
            handler.on_tool_start(ctx, tool, input).await;
        }
    }

    pub async fn on_tool_end(&self, ctx: &RunContext, observation: &str, duration_ms: u128) {
        for handler in &self.handlers {
            handler.on_tool_end(ctx, observation, duration_ms).await;
        }
    }
}

pub fn ensure_object(value: Value) -> Value {
    match value {
        Value::Object(_) => value,
        other => Value::Object(serde_json::Map::from_iter([("value".to_string(), other)])),
    }
}
