mod template;

pub use template::{render_text_description, PromptTemplate};
