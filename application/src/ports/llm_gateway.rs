//! LLM Gateway port
//!
//! Defines the interfaces for communicating with the answer providers and
//! the streaming synthesis provider.

use async_trait::async_trait;
use sages_domain::{CompletionRequest, CompletionResponse, Model, StreamEvent, decode_chunk};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Empty response: {0}")]
    EmptyResponse(String),

    #[error("Transport closed: {0}")]
    TransportClosed(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl GatewayError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GatewayError::Cancelled)
    }
}

/// A service that returns one complete text reply per call.
///
/// Implementations are built once at startup and shared between the
/// fan-out tasks, so they must be safe for concurrent use.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Get the model behind this provider
    fn model(&self) -> &Model;

    /// Send the prompt and wait for the full reply
    async fn answer(&self, prompt: &str) -> Result<String, GatewayError>;
}

/// A service that returns its reply as an incremental stream of chunks.
#[async_trait]
pub trait StreamingProvider: Send + Sync {
    /// Get the model behind this provider
    fn model(&self) -> &Model;

    /// Open a stream for the request.
    ///
    /// Errors returned here are failures to start the stream; failures
    /// while reading arrive as [`StreamEvent::Error`].
    async fn stream(&self, request: &CompletionRequest) -> Result<StreamHandle, GatewayError>;
}

/// Result of consuming a stream to the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    /// All fragments concatenated in arrival order
    pub response: CompletionResponse,
    /// Number of data chunks decoded
    pub chunks: usize,
    /// Number of unknown or empty events skipped
    pub skipped: usize,
}

/// Handle for receiving streaming events from a provider.
///
/// Wraps an `mpsc::Receiver<StreamEvent>`. The sequence is finite and can
/// only be consumed once.
pub struct StreamHandle {
    pub receiver: mpsc::Receiver<StreamEvent>,
}

impl StreamHandle {
    pub fn new(receiver: mpsc::Receiver<StreamEvent>) -> Self {
        Self { receiver }
    }

    /// Build a handle over a fixed list of events. The stream ends after
    /// the last one.
    pub fn from_events(events: Vec<StreamEvent>) -> Self {
        let (tx, rx) = mpsc::channel(events.len().max(1));
        for event in events {
            // Capacity covers every event, so this cannot fill up
            let _ = tx.try_send(event);
        }
        Self::new(rx)
    }

    /// Consume the stream, decoding every chunk in delivery order.
    ///
    /// `on_chunk` sees each fragment as soon as it is decoded, before it is
    /// appended to the running result. Unknown and empty events are logged
    /// and skipped.
    ///
    /// The first chunk that fails to decode ends consumption with
    /// [`GatewayError::Decode`]; whatever was accumulated up to that point
    /// is dropped and not returned. A transport error behaves the same way.
    /// The cancellation token is checked between events.
    pub async fn accumulate(
        mut self,
        mut on_chunk: impl FnMut(&str),
        cancellation: &CancellationToken,
    ) -> Result<StreamSummary, GatewayError> {
        let mut combined = String::new();
        let mut chunks = 0usize;
        let mut skipped = 0usize;

        loop {
            if cancellation.is_cancelled() {
                return Err(GatewayError::Cancelled);
            }

            let event = tokio::select! {
                biased;
                _ = cancellation.cancelled() => {
                    return Err(GatewayError::Cancelled);
                }
                event = self.receiver.recv() => event,
            };

            let Some(event) = event else {
                break;
            };

            match event {
                StreamEvent::Chunk(bytes) => {
                    let fragment = decode_chunk(&bytes).map_err(|e| {
                        GatewayError::Decode(format!("stream chunk #{}: {}", chunks + 1, e))
                    })?;
                    on_chunk(&fragment);
                    combined.push_str(&fragment);
                    chunks += 1;
                }
                StreamEvent::Unknown(tag) => {
                    warn!(tag = %tag, "Ignoring unknown stream event");
                    skipped += 1;
                }
                StreamEvent::Empty => {
                    debug!("Ignoring stream event without payload");
                    skipped += 1;
                }
                StreamEvent::Error(e) => {
                    return Err(GatewayError::TransportClosed(e));
                }
            }
        }

        debug!(chunks, skipped, bytes = combined.len(), "Stream finished");

        Ok(StreamSummary {
            response: CompletionResponse::new(combined),
            chunks,
            skipped,
        })
    }

    /// Consume the stream and collect all text into a single string.
    pub async fn collect_text(self) -> Result<String, GatewayError> {
        let summary = self
            .accumulate(|_| {}, &CancellationToken::new())
            .await?;
        Ok(summary.response.completion)
    }
}
