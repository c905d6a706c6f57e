//! Type conversions between AWS Bedrock SDK and domain types
//!
//! Converts response-stream events to domain `StreamEvent`s and SDK errors
//! to `GatewayError`.

use aws_sdk_bedrockruntime::error::{DisplayErrorContext, SdkError};
use aws_sdk_bedrockruntime::operation::invoke_model::InvokeModelError;
use aws_sdk_bedrockruntime::types::ResponseStream;
use sages_application::ports::llm_gateway::GatewayError;
use sages_domain::StreamEvent;

// ─── Bedrock → Domain ────────────────────────────────────────────

/// Convert one response-stream event to a domain StreamEvent.
///
/// A chunk without bytes becomes [`StreamEvent::Empty`]; any variant this
/// SDK version does not model becomes [`StreamEvent::Unknown`].
pub fn convert_stream_event(event: ResponseStream) -> StreamEvent {
    match event {
        ResponseStream::Chunk(part) => match part.bytes() {
            Some(blob) => StreamEvent::Chunk(blob.as_ref().to_vec()),
            None => StreamEvent::Empty,
        },
        other => StreamEvent::Unknown(format!("{:?}", other)),
    }
}

/// Convert an `InvokeModel` SDK error to a GatewayError.
pub fn convert_invoke_error(err: &SdkError<InvokeModelError>) -> GatewayError {
    match err {
        SdkError::ServiceError(service_err) => match service_err.err() {
            InvokeModelError::ThrottlingException(e) => {
                GatewayError::RequestFailed(format!("Bedrock throttled: {}", e))
            }
            InvokeModelError::ModelNotReadyException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not ready: {}", e))
            }
            InvokeModelError::ResourceNotFoundException(e) => {
                GatewayError::ModelNotAvailable(format!("Bedrock model not found: {}", e))
            }
            InvokeModelError::AccessDeniedException(e) => {
                GatewayError::RequestFailed(format!("Bedrock access denied: {}", e))
            }
            InvokeModelError::ValidationException(e) => {
                GatewayError::RequestFailed(format!("Bedrock validation error: {}", e))
            }
            other => GatewayError::RequestFailed(format!("Bedrock error: {:?}", other)),
        },
        other => convert_sdk_error("InvokeModel", other),
    }
}

/// Convert any SDK error to a GatewayError by its failure class.
pub fn convert_sdk_error<E, R>(operation: &str, err: &SdkError<E, R>) -> GatewayError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let detail = DisplayErrorContext(err).to_string();
    match err {
        SdkError::ServiceError(_) => {
            GatewayError::RequestFailed(format!("Bedrock {}: {}", operation, detail))
        }
        SdkError::ConstructionFailure(_) => {
            GatewayError::Serialization(format!("Bedrock {}: {}", operation, detail))
        }
        SdkError::ResponseError(_) => {
            GatewayError::Decode(format!("Bedrock {}: {}", operation, detail))
        }
        _ => GatewayError::ConnectionError(format!("Bedrock {}: {}", operation, detail)),
    }
}
