//! Text-completion request/response bodies.
//!
//! [`CompletionRequest`] is the JSON body sent to both the single-shot and
//! the streaming generation services. [`CompletionResponse`] is both the
//! one-shot reply and the shape of every streamed chunk, where
//! `completion` holds only the newly produced fragment.

use serde::{Deserialize, Deserializer, Serialize};

/// Tokens to sample for every request this system sends
pub const DEFAULT_MAX_TOKENS_TO_SAMPLE: u32 = 2048;

/// Request body for text completion.
///
/// Only `prompt` and `max_tokens_to_sample` are ever populated here; the
/// sampling fields are part of the wire contract and are omitted from the
/// JSON when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub max_tokens_to_sample: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens_to_sample: DEFAULT_MAX_TOKENS_TO_SAMPLE,
            temperature: None,
            top_p: None,
            top_k: None,
            stop_sequences: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens_to_sample = max_tokens;
        self
    }

    /// Serialize to the JSON body expected by the service
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Response body for text completion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub completion: String,
}

/// `"completion": null` reads as an empty fragment.
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl CompletionResponse {
    pub fn new(completion: impl Into<String>) -> Self {
        Self {
            completion: completion.into(),
        }
    }

    /// Decode a JSON body. Unknown fields (`stop_reason`, metrics, ...) are
    /// ignored.
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
