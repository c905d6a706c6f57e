//! Prompt value object

use crate::prompt::PromptTemplate;
use serde::{Deserialize, Serialize};

/// The prompt sent to both sages (Value Object)
///
/// Holds the user's raw input as typed and the text actually sent, which
/// is the input prefixed with the advisory preamble. Input is not
/// validated: an empty line is a valid (if unhelpful) question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    question: String,
    text: String,
}

impl Prompt {
    /// Build the advisory prompt for a raw user question
    pub fn advisory(question: impl Into<String>) -> Self {
        let question = question.into();
        let text = PromptTemplate::advisory(&question);
        Self { question, text }
    }

    /// The user's input as typed
    pub fn question(&self) -> &str {
        &self.question
    }

    /// The full text sent to the answer providers
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl std::fmt::Display for Prompt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.question)
    }
}
