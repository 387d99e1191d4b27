use std::sync::Arc;

type ToolFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// A named capability the model may invoke with a single string input.
#[derive(Clone)]
pub struct Tool {
    name: String,
    description: String,
    func: ToolFn,
}

impl Tool {
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn call(&self, input: &str) -> String {
        (self.func)(input)
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish()
    }
}
