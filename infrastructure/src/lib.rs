//! Infrastructure layer for two-sages
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod providers;

// Re-export commonly used types
pub use config::{ConfigError, ConfigLoader, FileConfig, LoadedConfig};
pub use providers::{
    ProviderKind,
    bedrock::{BedrockCompletionProvider, BedrockProviderAdapter},
    openai::OpenAiChatProvider,
    routing::{ProviderRouter, Providers, RoutePlan},
};
