use reactant_prompt::PromptTemplate;

use crate::ToolRegistry;

pub const REACT_TEMPLATE: &str = r#"Answer the following questions as best you can. You have access to the following tools:

{{tools}}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{{tool_names}}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

When you need to call a tool, output ONLY:
Thought: <your reasoning>
Action: <tool name>
Action Input: <input>
Do NOT output any "Final Answer" or additional text after the Action Input.

Begin!

Question: {{input}}
Thought: {{agent_scratchpad}}"#;

/// Binds the `tools` and `tool_names` partials of `template` from `registry`.
pub fn react_prompt(template: PromptTemplate, registry: &ToolRegistry) -> PromptTemplate {
    template
        .partial("tools", registry.render_description())
        .partial("tool_names", registry.names().join(", "))
}
