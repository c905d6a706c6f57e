//! Bedrock provider adapter
//!
//! Handles AWS credential initialization and hands out one
//! [`BedrockCompletionProvider`] per model, all sharing a single client.

use super::invoke::BedrockCompletionProvider;
use super::model_map;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use sages_application::ports::llm_gateway::GatewayError;
use sages_domain::{BedrockProviderConfig, Model};
use std::sync::Arc;
use tracing::info;

pub struct BedrockProviderAdapter {
    client: Arc<BedrockClient>,
    region: String,
    max_tokens: u32,
}

impl BedrockProviderAdapter {
    /// Create a new Bedrock provider adapter.
    ///
    /// Resolves credentials through the default AWS chain, restricted to
    /// `config.profile` when one is set.
    pub async fn new(config: &BedrockProviderConfig) -> Result<Self, GatewayError> {
        let mut aws_config_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(ref profile) = config.profile {
            aws_config_loader = aws_config_loader.profile_name(profile);
        }

        let aws_config = aws_config_loader.load().await;
        let client = BedrockClient::new(&aws_config);

        info!(
            region = %config.region,
            profile = config.profile.as_deref().unwrap_or("default"),
            "Bedrock client initialized"
        );

        Ok(Self {
            client: Arc::new(client),
            region: config.region.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Build a completion provider for `model`.
    pub fn completion_provider(
        &self,
        model: &Model,
    ) -> Result<BedrockCompletionProvider, GatewayError> {
        let bedrock_model_id = model_map::to_bedrock_model_id(model).ok_or_else(|| {
            GatewayError::ModelNotAvailable(format!("Model {} is not supported by Bedrock", model))
        })?;

        Ok(BedrockCompletionProvider::new(
            self.client.clone(),
            model.clone(),
            bedrock_model_id,
            self.max_tokens,
        ))
    }
}
