use std::io::Write;
use std::sync::Mutex;

use reactant_core::{CallbackHandler, LlmInput, LlmResult, RunContext, RunType, Value};

const RULE_WIDTH: usize = 60;

/// Prints every prompt, model response and tool call as a readable trace.
pub struct ConsoleCallbackHandler {
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleCallbackHandler {
    pub fn stdout() -> Self {
        Self::with_writer(std::io::stdout())
    }

    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(writer)),
        }
    }

    fn emit(&self, text: &str) {
        // A poisoned or closed sink must not take the agent down with it.
        if let Ok(mut out) = self.out.lock() {
            let _ = writeln!(out, "{text}");
            let _ = out.flush();
        }
    }

    fn banner(&self, marker: &str, title: &str, body: &str) {
        let rule = format!("{marker} {}", "=".repeat(RULE_WIDTH));
        self.emit(&format!("{rule}\n{title}\n{rule}\n{body}\n{rule}"));
    }
}

fn describe_step(output: &Value) -> String {
    let field = |name: &str| output.get(name).and_then(Value::as_str).unwrap_or("");
    match field("type") {
        "action" => format!(
            "AgentAction(tool='{}', tool_input='{}')",
            field("tool"),
            field("tool_input")
        ),
        "finish" => format!("AgentFinish(output='{}')", field("output")),
        _ => output.to_string(),
    }
}

#[async_trait::async_trait]
impl CallbackHandler for ConsoleCallbackHandler {
    async fn on_start(&self, ctx: &RunContext, inputs: &Value) {
        if ctx.run_type == RunType::Chain {
            if let Some(step) = inputs.get("step") {
                self.emit(&format!("🔄 Step {step}:"));
            }
        }
    }

    async fn on_end(&self, ctx: &RunContext, outputs: &Value, _duration_ms: u128) {
        if ctx.run_type == RunType::Chain {
            if let Some(output) = outputs.get("output") {
                self.emit(&format!("Agent Step: {}", describe_step(output)));
            }
        }
    }

    async fn on_error(&self, ctx: &RunContext, error: &Value, _duration_ms: u128) {
        if ctx.run_type == RunType::Llm {
            let message = error.get("error").and_then(Value::as_str).unwrap_or("");
            self.banner("❌", "🚨 LLM ERROR:", message);
        }
    }

    async fn on_llm_start(&self, _ctx: &RunContext, input: &LlmInput) {
        self.banner("🔍", "📝 PROMPT TO LLM:", &input.prompt);
    }

    async fn on_llm_end(&self, _ctx: &RunContext, result: &LlmResult, _duration_ms: u128) {
        self.banner("🤖", "💬 LLM RESPONSE:", result.text());
    }

    async fn on_tool_start(&self, _ctx: &RunContext, tool: &str, input: &str) {
        self.emit(&format!("🔧 Using tool: {tool} with input: {input}"));
    }

    async fn on_tool_end(&self, _ctx: &RunContext, observation: &str, _duration_ms: u128) {
        self.emit(&format!("📊 Observation: {observation}"));
    }
}
