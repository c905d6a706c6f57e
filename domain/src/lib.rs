//! Domain layer for two-sages
//!
//! This crate contains the models, prompt templates, wire types and result
//! value objects. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Sages**: two answer providers that each take a position on the
//!   user's question, queried in parallel
//! - **Synthesis**: a third model that weighs both positions and streams a
//!   final opinion back chunk by chunk

pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod providers;
pub mod session;

// Re-export commonly used types
pub use core::{model::Model, prompt::Prompt};
pub use orchestration::{
    entities::{Phase, Slot},
    value_objects::{Answer, AnswerPair, CouncilResult, SynthesisResult},
};
pub use prompt::PromptTemplate;
pub use providers::{BedrockProviderConfig, ModelsConfig, OpenAiProviderConfig, ProviderConfig};
pub use session::{
    request::{CompletionRequest, CompletionResponse, DEFAULT_MAX_TOKENS_TO_SAMPLE},
    stream::{StreamEvent, decode_chunk},
};
