use regex::Regex;

use crate::{AgentAction, AgentError, AgentFinish, AgentOutput};

const FINAL_ANSWER_ACTION: &str = "Final Answer:";
const ACTION_PATTERN: &str =
    r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)";
const ACTION_MARKER: &str = r"Action\s*\d*\s*:";

/// Parses single-input ReAct text into an action or a final answer.
///
/// `Final Answer:` takes precedence: a response carrying both a final
/// answer and an action is always a finish.
#[derive(Debug, Clone)]
pub struct ReActOutputParser {
    action: Regex,
    action_marker: Regex,
}

impl ReActOutputParser {
    pub fn new() -> Self {
        Self {
            action: Regex::new(ACTION_PATTERN).expect("action pattern is a valid regex"),
            action_marker: Regex::new(ACTION_MARKER).expect("action marker is a valid regex"),
        }
    }

    pub fn parse(&self, text: &str) -> Result<AgentOutput, AgentError> {
        if let Some((_, answer)) = text.rsplit_once(FINAL_ANSWER_ACTION) {
            return Ok(AgentOutput::Finish(AgentFinish {
                output: answer.trim().to_string(),
                log: text.to_string(),
            }));
        }

        if let Some(caps) = self.action.captures(text) {
            let tool = caps[1].trim().to_string();
            let tool_input = strip_quotes(caps[2].trim()).to_string();
            return Ok(AgentOutput::Action(AgentAction {
                tool,
                tool_input,
                log: text.to_string(),
            }));
        }

        let reason = if self.action_marker.is_match(text) {
            "missing 'Action Input:' after 'Action:'"
        } else {
            "missing 'Action:' after 'Thought:'"
        };
        Err(AgentError::Parse {
            raw: text.to_string(),
            reason: reason.to_string(),
        })
    }
}

impl Default for ReActOutputParser {
    fn default() -> Self {
        Self::new()
    }
}

fn strip_quotes(input: &str) -> &str {
    input
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(input)
}
