//! AWS Bedrock text-completion provider
//!
//! Provides access to Anthropic text-completion models via AWS IAM
//! authentication, both one-shot (`InvokeModel`) and streamed
//! (`InvokeModelWithResponseStream`).

mod adapter;
mod invoke;
mod model_map;
mod types;

pub use adapter::BedrockProviderAdapter;
pub use invoke::BedrockCompletionProvider;
pub use model_map::to_bedrock_model_id;
