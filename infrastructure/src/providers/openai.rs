//! OpenAI chat-completion provider
//!
//! Sends the prompt as a single user message and returns the first
//! choice's content.

use async_trait::async_trait;
use reqwest::Client;
use sages_application::ports::llm_gateway::{AnswerProvider, GatewayError};
use sages_domain::{Model, OpenAiProviderConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request body for the chat completions API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Non-streaming response from the chat completions API.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatCompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Error response from the API.
#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}

/// Answer provider backed by an OpenAI-compatible chat completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiChatProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    model: Model,
}

impl OpenAiChatProvider {
    /// Create a provider for `model`.
    ///
    /// Fails when no API key can be resolved from the config or the
    /// environment.
    pub fn new(
        client: Client,
        config: &OpenAiProviderConfig,
        model: Model,
    ) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            GatewayError::ConnectionError(format!(
                "OpenAI API key not found (set {})",
                config.api_key_env
            ))
        })?;

        Ok(Self {
            client,
            endpoint: chat_endpoint(&config.base_url),
            api_key,
            model,
        })
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}/v1/chat/completions", base_url.trim_end_matches('/'))
}

/// Extract the first choice's content from a successful response body.
fn parse_chat_response(body: &[u8]) -> Result<String, GatewayError> {
    let response: ChatCompletionResponse = serde_json::from_slice(body)
        .map_err(|e| GatewayError::Decode(format!("OpenAI response: {}", e)))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.unwrap_or_default())
        .ok_or_else(|| GatewayError::EmptyResponse("OpenAI returned no choices".to_string()))
}

/// Turn a non-2xx response into a gateway error, preferring the API's own
/// message when the body carries one.
fn parse_error_response(status: u16, body: &[u8]) -> GatewayError {
    match serde_json::from_slice::<OpenAiErrorResponse>(body) {
        Ok(parsed) => {
            let kind = parsed.error.error_type.as_deref().unwrap_or("error");
            GatewayError::RequestFailed(format!(
                "OpenAI {} ({}): {}",
                status, kind, parsed.error.message
            ))
        }
        Err(_) => GatewayError::RequestFailed(format!(
            "OpenAI {}: {}",
            status,
            String::from_utf8_lossy(body)
        )),
    }
}

#[async_trait]
impl AnswerProvider for OpenAiChatProvider {
    fn model(&self) -> &Model {
        &self.model
    }

    async fn answer(&self, prompt: &str) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: self.model.as_str(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model.as_str(), endpoint = %self.endpoint, "Calling chat completions");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::ConnectionError(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| GatewayError::ConnectionError(format!("OpenAI response body: {}", e)))?;

        if !status.is_success() {
            return Err(parse_error_response(status.as_u16(), &bytes));
        }

        parse_chat_response(&bytes)
    }
}
