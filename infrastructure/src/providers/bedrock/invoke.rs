//! Bedrock text-completion provider
//!
//! Wraps `InvokeModel` (one-shot answers) and
//! `InvokeModelWithResponseStream` (streamed synthesis) for Anthropic
//! text-completion models. Both share the same JSON request body.

use super::types;
use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::primitives::Blob;
use sages_application::ports::llm_gateway::{
    AnswerProvider, GatewayError, StreamHandle, StreamingProvider,
};
use sages_domain::{CompletionRequest, CompletionResponse, Model, PromptTemplate, StreamEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const CONTENT_TYPE_JSON: &str = "application/json";

/// Events buffered between the SDK reader task and the consumer
const STREAM_BUFFER: usize = 64;

pub struct BedrockCompletionProvider {
    client: Arc<BedrockClient>,
    model: Model,
    bedrock_model_id: String,
    max_tokens: u32,
}

impl BedrockCompletionProvider {
    pub fn new(
        client: Arc<BedrockClient>,
        model: Model,
        bedrock_model_id: String,
        max_tokens: u32,
    ) -> Self {
        Self {
            client,
            model,
            bedrock_model_id,
            max_tokens,
        }
    }

    pub fn bedrock_model_id(&self) -> &str {
        &self.bedrock_model_id
    }

    /// Wrap a plain prompt in a Human/Assistant turn.
    pub fn completion_request(&self, prompt: &str) -> CompletionRequest {
        CompletionRequest::new(PromptTemplate::human_turn(prompt)).with_max_tokens(self.max_tokens)
    }

    fn encode(request: &CompletionRequest) -> Result<Blob, GatewayError> {
        request
            .to_json_bytes()
            .map(Blob::new)
            .map_err(|e| GatewayError::Serialization(format!("completion request: {}", e)))
    }

    /// Execute an InvokeModel call and decode the completion.
    async fn invoke(&self, request: &CompletionRequest) -> Result<CompletionResponse, GatewayError> {
        let body = Self::encode(request)?;

        debug!(
            model = %self.bedrock_model_id,
            max_tokens = request.max_tokens_to_sample,
            "Calling Bedrock InvokeModel"
        );

        let output = self
            .client
            .invoke_model()
            .model_id(&self.bedrock_model_id)
            .content_type(CONTENT_TYPE_JSON)
            .accept(CONTENT_TYPE_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| types::convert_invoke_error(&e))?;

        CompletionResponse::from_json_bytes(output.body().as_ref())
            .map_err(|e| GatewayError::Decode(format!("Bedrock completion: {}", e)))
    }
}

#[async_trait]
impl AnswerProvider for BedrockCompletionProvider {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn answer(&self, prompt: &str) -> Result<String, GatewayError> {
        let request = self.completion_request(prompt);
        let response = self.invoke(&request).await?;
        Ok(response.completion)
    }
}

#[async_trait]
impl StreamingProvider for BedrockCompletionProvider {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn stream(&self, request: &CompletionRequest) -> Result<StreamHandle, GatewayError> {
        let body = Self::encode(request)?;

        debug!(
            model = %self.bedrock_model_id,
            max_tokens = request.max_tokens_to_sample,
            "Calling Bedrock InvokeModelWithResponseStream"
        );

        let mut output = self
            .client
            .invoke_model_with_response_stream()
            .model_id(&self.bedrock_model_id)
            .content_type(CONTENT_TYPE_JSON)
            .accept(CONTENT_TYPE_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| types::convert_sdk_error("InvokeModelWithResponseStream", &e))?;

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let model_id = self.bedrock_model_id.clone();

        tokio::spawn(async move {
            loop {
                match output.body.recv().await {
                    Ok(Some(event)) => {
                        if tx.send(types::convert_stream_event(event)).await.is_err() {
                            debug!(model = %model_id, "Stream consumer dropped");
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let error = types::convert_sdk_error("response stream", &e);
                        warn!(model = %model_id, "Stream read failed: {}", error);
                        let _ = tx.send(StreamEvent::Error(error.to_string())).await;
                        break;
                    }
                }
            }
        });

        Ok(StreamHandle::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockruntime::config::{BehaviorVersion, Config, Region};

    fn provider(max_tokens: u32) -> BedrockCompletionProvider {
        let config = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        BedrockCompletionProvider::new(
            Arc::new(BedrockClient::from_conf(config)),
            Model::ClaudeInstantV1,
            "anthropic.claude-instant-v1".to_string(),
            max_tokens,
        )
    }

    #[test]
    fn test_completion_request_wraps_prompt() {
        let request = provider(2048).completion_request("賛成か反対か");

        assert_eq!(request.prompt, "\n\nHuman: 賛成か反対か\n\nAssistant:");
        assert_eq!(request.max_tokens_to_sample, 2048);
        assert!(request.stop_sequences.is_none());
    }

    #[test]
    fn test_encode_produces_wire_json() {
        let request = provider(300).completion_request("q");
        let blob = BedrockCompletionProvider::encode(&request).unwrap();
        let json: serde_json::Value = serde_json::from_slice(blob.as_ref()).unwrap();

        assert_eq!(json["max_tokens_to_sample"], 300);
        assert_eq!(json["prompt"], "\n\nHuman: q\n\nAssistant:");
    }
}
