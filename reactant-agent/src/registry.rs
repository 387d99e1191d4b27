use std::collections::BTreeMap;

use reactant_prompt::render_text_description;

use crate::{AgentError, RegistryError, Tool};

#[derive(Clone, Debug, Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Tool>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Tool) -> Result<(), RegistryError> {
        if tool.name().trim().is_empty() {
            return Err(RegistryError::InvalidName {
                name: tool.name().to_string(),
            });
        }

        if self.tools.contains_key(tool.name()) {
            return Err(RegistryError::DuplicateTool {
                name: tool.name().to_string(),
            });
        }

        self.tools.insert(tool.name().to_string(), tool);
        Ok(())
    }

    pub fn with_tool(mut self, tool: Tool) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    pub fn lookup(&self, name: &str) -> Result<&Tool, AgentError> {
        self.tools.get(name).ok_or_else(|| AgentError::ToolNotFound {
            name: name.to_string(),
            available: self.tools.keys().cloned().collect(),
        })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn render_description(&self) -> String {
        let entries: Vec<(&str, &str)> = self
            .tools
            .values()
            .map(|tool| (tool.name(), tool.description()))
            .collect();
        render_text_description(&entries)
    }
}
