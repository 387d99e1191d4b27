use crate::IntermediateStep;

const OBSERVATION_PREFIX: &str = "Observation: ";
const LLM_PREFIX: &str = "Thought: ";

/// Replays past steps as the text the model would have produced had it
/// seen each observation inline.
pub fn format_log_to_str(steps: &[IntermediateStep]) -> String {
    let mut thoughts = String::new();
    for step in steps {
        thoughts.push_str(&step.action.log);
        thoughts.push('\n');
        thoughts.push_str(OBSERVATION_PREFIX);
        thoughts.push_str(&step.observation);
        thoughts.push('\n');
        thoughts.push_str(LLM_PREFIX);
    }
    thoughts
}
