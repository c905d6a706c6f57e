//! Streaming events for a text-completion stream.
//!
//! [`StreamEvent`] is what the infrastructure layer hands to the
//! application layer for every frame of a streamed response. Chunks keep
//! their raw bytes; turning them into text is [`decode_chunk`]'s job so
//! that decode failures surface where the stream is consumed.

use super::request::CompletionResponse;

/// An event in a streaming completion response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A data chunk: a JSON-encoded partial [`CompletionResponse`].
    Chunk(Vec<u8>),
    /// An event variant the transport did not recognise.
    Unknown(String),
    /// A frame that carried no payload.
    Empty,
    /// The transport failed while reading the stream.
    Error(String),
}

impl StreamEvent {
    pub fn chunk(bytes: impl Into<Vec<u8>>) -> Self {
        StreamEvent::Chunk(bytes.into())
    }
}

/// Decode one chunk's payload into its text fragment.
///
/// Pure function of the bytes: decoding the same chunk twice yields the
/// same fragment.
pub fn decode_chunk(bytes: &[u8]) -> Result<String, serde_json::Error> {
    CompletionResponse::from_json_bytes(bytes).map(|response| response.completion)
}
