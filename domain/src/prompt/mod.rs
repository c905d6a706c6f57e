//! Prompt domain
//!
//! Fixed templates used to build the advisory and synthesis prompts.

mod template;

pub use template::PromptTemplate;
