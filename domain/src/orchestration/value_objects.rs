//! Orchestration value objects - immutable result types for a run.
//!
//! - [`Answer`] - one sage's complete reply
//! - [`AnswerPair`] - both replies, joined after the fan-out
//! - [`SynthesisResult`] - the accumulated streamed opinion
//! - [`CouncilResult`] - everything a run produced

use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Complete reply from a single answer provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The model that generated this answer
    pub model: Model,
    /// The answer text
    pub content: String,
}

impl Answer {
    pub fn new(model: Model, content: impl Into<String>) -> Self {
        Self {
            model,
            content: content.into(),
        }
    }
}

/// Both answers from the fan-out.
///
/// `first` always comes from the first provider and `second` from the
/// second, whichever finished first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPair {
    pub first: Answer,
    pub second: Answer,
}

impl AnswerPair {
    pub fn new(first: Answer, second: Answer) -> Self {
        Self { first, second }
    }

    /// Iterate in provider order
    pub fn iter(&self) -> impl Iterator<Item = &Answer> {
        [&self.first, &self.second].into_iter()
    }
}

/// Final opinion from the synthesizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// The model that streamed the opinion
    pub moderator: Model,
    /// All streamed fragments concatenated in arrival order
    pub conclusion: String,
    /// Number of text chunks received
    pub chunks: usize,
}

impl SynthesisResult {
    pub fn new(moderator: Model, conclusion: impl Into<String>, chunks: usize) -> Self {
        Self {
            moderator,
            conclusion: conclusion.into(),
            chunks,
        }
    }
}

/// Complete result of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouncilResult {
    /// The user's question as typed
    pub question: String,
    /// Answers from both sages
    pub answers: AnswerPair,
    /// The synthesized opinion
    pub synthesis: SynthesisResult,
}

impl CouncilResult {
    pub fn new(
        question: impl Into<String>,
        answers: AnswerPair,
        synthesis: SynthesisResult,
    ) -> Self {
        Self {
            question: question.into(),
            answers,
            synthesis,
        }
    }
}
