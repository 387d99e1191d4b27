use std::collections::HashMap;

use reactant_core::{
    CallbackManager, Llm, LlmInput, LlmRequest, LlmResponse, LlmResult, ReactantError,
    RunContext, RunType, Value,
};
use reactant_prompt::PromptTemplate;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::{
    format_log_to_str, react_prompt, AgentConfig, AgentError, AgentFinish, AgentOutput,
    IntermediateStep, ReActOutputParser, ToolRegistry, REACT_TEMPLATE,
};

const AGENT_RUN_NAME: &str = "react_agent";
const STEP_RUN_NAME: &str = "react_step";

/// Result of a run that reached a final answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRun {
    pub output: String,
    pub log: String,
    pub steps: Vec<IntermediateStep>,
    pub iterations: usize,
}

enum RunState {
    Running,
    Done(AgentFinish),
}

/// Drives the ReAct loop: render, invoke, parse, then either finish or
/// dispatch the requested tool and go around again.
pub struct AgentExecutor<L> {
    llm: L,
    tools: ToolRegistry,
    prompt: PromptTemplate,
    parser: ReActOutputParser,
    config: AgentConfig,
    callbacks: CallbackManager,
}

impl<L> AgentExecutor<L>
where
    L: Llm,
{
    pub fn new(llm: L, tools: ToolRegistry, config: AgentConfig) -> Self {
        let prompt = react_prompt(PromptTemplate::new(REACT_TEMPLATE), &tools);
        Self {
            llm,
            tools,
            prompt,
            parser: ReActOutputParser::new(),
            config,
            callbacks: CallbackManager::noop(),
        }
    }

    /// Replaces the prompt. `tools` and `tool_names` are bound from the registry;
    /// `input` and `agent_scratchpad` are supplied on every step.
    pub fn with_prompt(mut self, template: PromptTemplate) -> Self {
        self.prompt = react_prompt(template, &self.tools);
        self
    }

    pub fn with_callbacks(mut self, callbacks: CallbackManager) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn render_prompt(
        &self,
        question: &str,
        steps: &[IntermediateStep],
    ) -> Result<String, AgentError> {
        let vars = HashMap::from([
            ("input".to_string(), Value::from(question)),
            (
                "agent_scratchpad".to_string(),
                Value::from(format_log_to_str(steps)),
            ),
        ]);
        self.prompt.render(&vars).map_err(AgentError::Prompt)
    }

    /// One render, invoke, parse pass over the given history.
    pub async fn plan(
        &self,
        question: &str,
        steps: &[IntermediateStep],
    ) -> Result<AgentOutput, AgentError> {
        let root = RunContext::root(RunType::Agent, AGENT_RUN_NAME.to_string());
        self.plan_within(&root, question, steps, &CancellationToken::new())
            .await
    }

    pub async fn run(&self, question: &str) -> Result<AgentRun, AgentError> {
        self.run_with_cancellation(question, &CancellationToken::new())
            .await
    }

    pub async fn run_with_cancellation(
        &self,
        question: &str,
        cancellation: &CancellationToken,
    ) -> Result<AgentRun, AgentError> {
        let root = RunContext::root(RunType::Agent, AGENT_RUN_NAME.to_string());
        self.callbacks
            .on_start(&root, &serde_json::json!({ "input": question }))
            .await;

        let result = self.drive(&root, question, cancellation).await;
        match &result {
            Ok(run) => {
                tracing::info!(iterations = run.iterations, "agent finished");
                self.callbacks
                    .on_end(
                        &root,
                        &serde_json::json!({ "output": run.output, "iterations": run.iterations }),
                        root.elapsed_ms(),
                    )
                    .await;
            }
            Err(error) => {
                tracing::warn!(error = %describe(error), "agent run failed");
                self.callbacks
                    .on_error(
                        &root,
                        &serde_json::json!({ "error": describe(error) }),
                        root.elapsed_ms(),
                    )
                    .await;
            }
        }
        result
    }

    async fn drive(
        &self,
        root: &RunContext,
        question: &str,
        cancellation: &CancellationToken,
    ) -> Result<AgentRun, AgentError> {
        let mut steps = Vec::new();
        let mut iterations = 0;

        loop {
            if cancellation.is_cancelled() {
                return Err(AgentError::Cancelled);
            }
            if iterations >= self.config.max_steps {
                return Err(AgentError::MaxStepsExceeded {
                    max_steps: self.config.max_steps,
                });
            }
            iterations += 1;

            let span = tracing::info_span!("react_step", step = iterations);
            let state = self
                .step(root, iterations, question, &mut steps, cancellation)
                .instrument(span)
                .await?;

            if let RunState::Done(finish) = state {
                return Ok(AgentRun {
                    output: finish.output,
                    log: finish.log,
                    steps,
                    iterations,
                });
            }
        }
    }

    async fn step(
        &self,
        root: &RunContext,
        step: usize,
        question: &str,
        steps: &mut Vec<IntermediateStep>,
        cancellation: &CancellationToken,
    ) -> Result<RunState, AgentError> {
        let ctx = root.child(RunType::Chain, STEP_RUN_NAME.to_string());
        self.callbacks
            .on_start(&ctx, &serde_json::json!({ "step": step }))
            .await;

        let planned = self
            .plan_within(&ctx, question, steps, cancellation)
            .await
            .and_then(|output| {
                if let AgentOutput::Action(action) = &output {
                    self.tools.lookup(&action.tool)?;
                }
                Ok(output)
            });
        let output = match planned {
            Ok(output) => output,
            Err(error) => {
                self.callbacks
                    .on_error(
                        &ctx,
                        &serde_json::json!({ "error": describe(&error) }),
                        ctx.elapsed_ms(),
                    )
                    .await;
                return Err(error);
            }
        };

        if !self.callbacks.is_noop() {
            let traced = serde_json::to_value(&output).unwrap_or(Value::Null);
            self.callbacks
                .on_end(
                    &ctx,
                    &serde_json::json!({ "step": step, "output": traced }),
                    ctx.elapsed_ms(),
                )
                .await;
        }

        match output {
            AgentOutput::Finish(finish) => {
                tracing::info!(output = %finish.output, "model produced final answer");
                Ok(RunState::Done(finish))
            }
            AgentOutput::Action(action) => {
                let tool = self.tools.lookup(&action.tool)?;
                let tool_ctx = ctx.child(RunType::Tool, tool.name().to_string());

                tracing::info!(tool = tool.name(), input = %action.tool_input, "dispatching tool");
                self.callbacks
                    .on_tool_start(&tool_ctx, tool.name(), &action.tool_input)
                    .await;
                let observation = tool.call(&action.tool_input);
                self.callbacks
                    .on_tool_end(&tool_ctx, &observation, tool_ctx.elapsed_ms())
                    .await;

                steps.push(IntermediateStep::new(action, observation));
                Ok(RunState::Running)
            }
        }
    }

    async fn plan_within(
        &self,
        parent: &RunContext,
        question: &str,
        steps: &[IntermediateStep],
        cancellation: &CancellationToken,
    ) -> Result<AgentOutput, AgentError> {
        let prompt = self.render_prompt(question, steps)?;
        let response = self.invoke_model(parent, prompt, cancellation).await?;
        self.parser.parse(&response.text)
    }

    async fn invoke_model(
        &self,
        parent: &RunContext,
        prompt: String,
        cancellation: &CancellationToken,
    ) -> Result<LlmResponse, AgentError> {
        let request = LlmRequest {
            model: self.config.model.clone(),
            prompt,
            stop: self.config.stop.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let model_name = if request.model.is_empty() {
            "llm".to_string()
        } else {
            request.model.clone()
        };
        let ctx = parent.child(RunType::Llm, model_name.clone());

        tracing::debug!(prompt = %request.prompt, "invoking model");
        self.callbacks
            .on_llm_start(&ctx, &LlmInput::from(&request))
            .await;

        let result = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(AgentError::Cancelled),
            result = self.call_model(request) => result.map_err(AgentError::ModelInvocation),
        };

        match &result {
            Ok(response) => {
                tracing::debug!(response = %response.text, "model responded");
                self.callbacks
                    .on_llm_end(
                        &ctx,
                        &LlmResult::from_response(model_name, response),
                        ctx.elapsed_ms(),
                    )
                    .await;
            }
            Err(error) => {
                self.callbacks
                    .on_error(
                        &ctx,
                        &serde_json::json!({ "error": describe(error) }),
                        ctx.elapsed_ms(),
                    )
                    .await;
            }
        }
        result
    }

    async fn call_model(&self, request: LlmRequest) -> Result<LlmResponse, ReactantError> {
        match self.config.model_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.llm.invoke(request)).await {
                Ok(result) => result,
                Err(_) => Err(ReactantError::Timeout(limit)),
            },
            None => self.llm.invoke(request).await,
        }
    }
}

/// Error message with its source chain, `outer: inner: ...`.
fn describe(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
