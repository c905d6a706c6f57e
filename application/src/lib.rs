//! Application layer for two-sages
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    llm_gateway::{AnswerProvider, GatewayError, StreamHandle, StreamSummary, StreamingProvider},
    progress::{NoProgress, ProgressNotifier},
};
pub use use_cases::fan_out::{FanOutCoordinator, FanOutError};
pub use use_cases::run_council::{RunCouncilError, RunCouncilInput, RunCouncilUseCase};
