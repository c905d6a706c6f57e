//! Provider routing
//!
//! Decides which adapter serves each role and assembles the providers the
//! council needs. Adapters are only initialized when a role routes to them,
//! so an all-Bedrock setup never asks for an OpenAI key.

use super::ProviderKind;
use super::bedrock::BedrockProviderAdapter;
use super::openai::OpenAiChatProvider;
use sages_application::ports::llm_gateway::{AnswerProvider, GatewayError, StreamingProvider};
use sages_domain::{Model, ModelsConfig, ProviderConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// The three providers a council run needs.
pub struct Providers {
    pub first: Arc<dyn AnswerProvider>,
    pub second: Arc<dyn AnswerProvider>,
    pub synthesizer: Arc<dyn StreamingProvider>,
}

/// Provider kind chosen for each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutePlan {
    pub first: ProviderKind,
    pub second: ProviderKind,
    pub synthesizer: ProviderKind,
}

impl RoutePlan {
    pub fn for_models(models: &ModelsConfig) -> Result<Self, GatewayError> {
        let synthesizer = ProviderKind::for_model(&models.synthesizer);
        if synthesizer != ProviderKind::Bedrock {
            return Err(GatewayError::ModelNotAvailable(format!(
                "Model {} cannot stream; the synthesizer must be a Bedrock model",
                models.synthesizer.as_str()
            )));
        }

        Ok(Self {
            first: ProviderKind::for_model(&models.first),
            second: ProviderKind::for_model(&models.second),
            synthesizer,
        })
    }

    pub fn needs(&self, kind: ProviderKind) -> bool {
        self.first == kind || self.second == kind || self.synthesizer == kind
    }
}

pub struct ProviderRouter {
    config: ProviderConfig,
}

impl ProviderRouter {
    pub fn new(config: ProviderConfig) -> Self {
        Self { config }
    }

    pub fn plan(&self) -> Result<RoutePlan, GatewayError> {
        RoutePlan::for_models(&self.config.models)
    }

    /// Initialize the adapters the plan needs and build every role's provider.
    ///
    /// Fails before any network call when a required credential is missing
    /// or a model has no adapter.
    pub async fn build(&self) -> Result<Providers, GatewayError> {
        let plan = self.plan()?;
        let models = &self.config.models;
        debug!(?plan, "Resolved provider routes");

        let bedrock = BedrockProviderAdapter::new(&self.config.bedrock).await?;
        let http = if plan.needs(ProviderKind::OpenAi) {
            Some(reqwest::Client::new())
        } else {
            None
        };

        let answer_provider = |model: &Model,
                               kind: ProviderKind|
         -> Result<Arc<dyn AnswerProvider>, GatewayError> {
            match (kind, &http) {
                (ProviderKind::OpenAi, Some(client)) => Ok(Arc::new(OpenAiChatProvider::new(
                    client.clone(),
                    &self.config.openai,
                    model.clone(),
                )?)),
                (ProviderKind::OpenAi, None) => Err(GatewayError::ModelNotAvailable(format!(
                    "No OpenAI client for {}",
                    model
                ))),
                (ProviderKind::Bedrock, _) => Ok(Arc::new(bedrock.completion_provider(model)?)),
            }
        };

        let first = answer_provider(&models.first, plan.first)?;
        let second = answer_provider(&models.second, plan.second)?;
        let synthesizer: Arc<dyn StreamingProvider> =
            Arc::new(bedrock.completion_provider(&models.synthesizer)?);

        info!(
            first = %models.first.as_str(),
            second = %models.second.as_str(),
            synthesizer = %models.synthesizer.as_str(),
            region = bedrock.region(),
            "Providers ready"
        );

        Ok(Providers {
            first,
            second,
            synthesizer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_plan() {
        let plan = RoutePlan::for_models(&ModelsConfig::default()).unwrap();

        assert_eq!(plan.first, ProviderKind::OpenAi);
        assert_eq!(plan.second, ProviderKind::Bedrock);
        assert_eq!(plan.synthesizer, ProviderKind::Bedrock);
        assert!(plan.needs(ProviderKind::OpenAi));
    }

    #[test]
    fn test_all_bedrock_plan_skips_openai() {
        let models = ModelsConfig {
            first: Model::ClaudeV21,
            second: Model::ClaudeInstantV1,
            synthesizer: Model::ClaudeV2,
        };
        let plan = RoutePlan::for_models(&models).unwrap();

        assert!(!plan.needs(ProviderKind::OpenAi));
        assert!(plan.needs(ProviderKind::Bedrock));
    }

    #[test]
    fn test_gpt_synthesizer_is_rejected() {
        let models = ModelsConfig {
            synthesizer: Model::Gpt4,
            ..Default::default()
        };
        let err = RoutePlan::for_models(&models).unwrap_err();

        assert!(matches!(err, GatewayError::ModelNotAvailable(_)));
        assert!(err.to_string().contains("gpt-4"));
    }

    #[test]
    fn test_router_plan_uses_configured_models() {
        let router = ProviderRouter::new(ProviderConfig {
            models: ModelsConfig {
                first: Model::from("meta.llama3-70b-instruct-v1:0"),
                ..Default::default()
            },
            ..Default::default()
        });

        assert_eq!(router.plan().unwrap().first, ProviderKind::Bedrock);
    }
}
