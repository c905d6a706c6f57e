//! Provider configuration types (provider-neutral, serde-free).
//!
//! These types define the shape of provider settings without depending
//! on any serialization format (TOML, environment, etc.).

use crate::core::model::Model;
use crate::session::request::DEFAULT_MAX_TOKENS_TO_SAMPLE;

/// Region used when neither the config nor the environment names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Top-level provider configuration.
#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    /// OpenAI chat-completion settings.
    pub openai: OpenAiProviderConfig,
    /// AWS Bedrock settings.
    pub bedrock: BedrockProviderConfig,
    /// Which model plays which role.
    pub models: ModelsConfig,
}

/// AWS Bedrock provider configuration.
#[derive(Debug, Clone)]
pub struct BedrockProviderConfig {
    /// AWS region (default: "us-east-1").
    pub region: String,
    /// AWS shared-config profile name for credentials.
    pub profile: Option<String>,
    /// `max_tokens_to_sample` for every request (default: 2048).
    pub max_tokens: u32,
}

impl Default for BedrockProviderConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION.to_string(),
            profile: None,
            max_tokens: DEFAULT_MAX_TOKENS_TO_SAMPLE,
        }
    }
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiProviderConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the environment variable.
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API.
    pub base_url: String,
}

impl Default for OpenAiProviderConfig {
    fn default() -> Self {
        Self {
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
        }
    }
}

impl OpenAiProviderConfig {
    /// Resolve the API key: explicit value first, then the named variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|key| !key.is_empty())
    }
}

/// Model assignment for each role.
#[derive(Debug, Clone)]
pub struct ModelsConfig {
    /// Sage A, asked through the chat-completion service.
    pub first: Model,
    /// Sage B, asked through the single-shot generation service.
    pub second: Model,
    /// Streams the final opinion.
    pub synthesizer: Model,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            first: Model::default_first(),
            second: Model::default_second(),
            synthesizer: Model::default_synthesizer(),
        }
    }
}
