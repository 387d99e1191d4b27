use std::collections::{BTreeSet, HashMap};

use regex::Regex;
use reactant_core::{ReactantError, Value};

const PLACEHOLDER: &str = r"\{\{\s*(\w+)\s*\}\}";

/// A text template with `{{ name }}` placeholders.
///
/// Variables bound with [`PromptTemplate::partial`] are fixed for every
/// render; variables passed to [`PromptTemplate::render`] take precedence
/// over partials of the same name.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    partials: HashMap<String, Value>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            partials: HashMap::new(),
        }
    }

    pub fn partial(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.partials.insert(name.into(), value.into());
        self
    }

    /// Placeholder names that still need a value at render time.
    pub fn input_variables(&self) -> Vec<String> {
        let Ok(pattern) = Regex::new(PLACEHOLDER) else {
            return Vec::new();
        };
        pattern
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .filter(|name| !self.partials.contains_key(name))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, ReactantError> {
        let pattern =
            Regex::new(PLACEHOLDER).map_err(|e| ReactantError::InvalidConfig(e.to_string()))?;

        if let Some(missing) = pattern
            .captures_iter(&self.template)
            .map(|caps| caps[1].to_string())
            .find(|name| !vars.contains_key(name) && !self.partials.contains_key(name))
        {
            return Err(ReactantError::InvalidConfig(format!(
                "missing prompt variable '{missing}'"
            )));
        }

        let rendered = pattern.replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            match vars.get(key).or_else(|| self.partials.get(key)) {
                Some(value) => value
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| value.to_string()),
                None => String::new(),
            }
        });
        Ok(rendered.into_owned())
    }
}

/// One `name: description` line per tool.
pub fn render_text_description<N, D>(tools: &[(N, D)]) -> String
where
    N: AsRef<str>,
    D: AsRef<str>,
{
    tools
        .iter()
        .map(|(name, description)| format!("{}: {}", name.as_ref(), description.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
