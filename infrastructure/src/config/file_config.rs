//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted to domain/application
//! config types afterwards.
//!
//! ```toml
//! [providers.openai]
//! api_key_env = "OPENAI_API_KEY"
//! base_url = "https://api.openai.com"
//!
//! [providers.bedrock]
//! region = "us-east-1"
//! profile = "work"
//! max_tokens = 2048
//!
//! [models]
//! first = "gpt-3.5-turbo"
//! second = "claude-instant-v1"
//! synthesizer = "claude-v2"
//!
//! [behavior]
//! synthesis_delay_ms = 2000
//! ```

use sages_application::BehaviorConfig;
use sages_domain::{
    BedrockProviderConfig, DEFAULT_MAX_TOKENS_TO_SAMPLE, Model, ModelsConfig,
    OpenAiProviderConfig, ProviderConfig,
};
use serde::{Deserialize, Serialize};

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider settings
    pub providers: FileProvidersConfig,
    /// Which model plays which role
    pub models: FileModelsConfig,
    /// Run behavior
    pub behavior: FileBehaviorConfig,
}

impl FileConfig {
    pub fn to_provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            openai: self.providers.openai.to_domain(),
            bedrock: self.providers.bedrock.to_domain(),
            models: self.models.to_domain(),
        }
    }

    /// The synthesis request shares the Bedrock token limit.
    pub fn to_behavior_config(&self) -> BehaviorConfig {
        BehaviorConfig::default()
            .with_synthesis_delay_ms(self.behavior.synthesis_delay_ms)
            .with_max_tokens(self.providers.bedrock.max_tokens)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    /// OpenAI API settings.
    pub openai: FileOpenAiConfig,
    /// AWS Bedrock settings.
    pub bedrock: FileBedrockConfig,
}

/// OpenAI API provider configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOpenAiConfig {
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key. Prefer the environment variable.
    pub api_key: Option<String>,
    /// Base URL for the OpenAI API.
    pub base_url: String,
}

impl Default for FileOpenAiConfig {
    fn default() -> Self {
        let defaults = OpenAiProviderConfig::default();
        Self {
            api_key_env: defaults.api_key_env,
            api_key: defaults.api_key,
            base_url: defaults.base_url,
        }
    }
}

impl FileOpenAiConfig {
    fn to_domain(&self) -> OpenAiProviderConfig {
        OpenAiProviderConfig {
            api_key_env: self.api_key_env.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBedrockConfig {
    /// AWS region for Bedrock models (default: "us-east-1")
    pub region: String,
    /// AWS profile name for credentials
    pub profile: Option<String>,
    /// `max_tokens_to_sample` per request (default: 2048)
    pub max_tokens: u32,
}

impl Default for FileBedrockConfig {
    fn default() -> Self {
        let defaults = BedrockProviderConfig::default();
        Self {
            region: defaults.region,
            profile: defaults.profile,
            max_tokens: DEFAULT_MAX_TOKENS_TO_SAMPLE,
        }
    }
}

impl FileBedrockConfig {
    fn to_domain(&self) -> BedrockProviderConfig {
        BedrockProviderConfig {
            region: self.region.clone(),
            profile: self.profile.clone(),
            max_tokens: self.max_tokens,
        }
    }
}

/// Role-based model configuration from TOML (`[models]` section)
///
/// Unset or blank entries fall back to the built-in assignment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelsConfig {
    /// Sage A
    pub first: Option<String>,
    /// Sage B
    pub second: Option<String>,
    /// Streams the final opinion
    pub synthesizer: Option<String>,
}

impl FileModelsConfig {
    fn parse_model(value: Option<&String>, fallback: Model) -> Model {
        match value {
            Some(s) if !s.trim().is_empty() => Model::from(s.trim()),
            _ => fallback,
        }
    }

    fn to_domain(&self) -> ModelsConfig {
        ModelsConfig {
            first: Self::parse_model(self.first.as_ref(), Model::default_first()),
            second: Self::parse_model(self.second.as_ref(), Model::default_second()),
            synthesizer: Self::parse_model(
                self.synthesizer.as_ref(),
                Model::default_synthesizer(),
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// Pause before the synthesis call, in milliseconds (default: 2000)
    pub synthesis_delay_ms: u64,
}

impl Default for FileBehaviorConfig {
    fn default() -> Self {
        Self {
            synthesis_delay_ms: 2000,
        }
    }
}
