//! Provider adapters
//!
//! - [`openai`] - chat-completion answers over HTTP
//! - [`bedrock`] - single-shot and streaming text completion on AWS Bedrock
//! - [`routing`] - picks the adapter for each configured model

pub mod bedrock;
pub mod openai;
pub mod routing;

use sages_domain::Model;

/// Model-id prefixes of the vendors hosted on Bedrock
const BEDROCK_VENDOR_PREFIXES: &[&str] = &[
    "anthropic.",
    "amazon.",
    "meta.",
    "cohere.",
    "ai21.",
    "mistral.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Bedrock,
}

impl ProviderKind {
    /// Infer the provider from the model family. Custom ids that carry a
    /// Bedrock vendor prefix go to Bedrock, everything else to OpenAI.
    pub fn for_model(model: &Model) -> Self {
        match model {
            m if m.is_claude() => ProviderKind::Bedrock,
            m if m.is_gpt() => ProviderKind::OpenAi,
            Model::Custom(id)
                if BEDROCK_VENDOR_PREFIXES
                    .iter()
                    .any(|prefix| id.starts_with(prefix)) =>
            {
                ProviderKind::Bedrock
            }
            _ => ProviderKind::OpenAi,
        }
    }
}
