//! Bedrock model ID mapping
//!
//! Maps domain `Model` variants to Bedrock model identifiers.

use sages_domain::Model;

/// Convert a domain Model to a Bedrock model ID string.
///
/// Returns `None` for models Bedrock does not host (GPT).
/// Custom ids are passed through as-is.
pub fn to_bedrock_model_id(model: &Model) -> Option<String> {
    let id = match model {
        Model::ClaudeInstantV1 => "anthropic.claude-instant-v1",
        Model::ClaudeV2 => "anthropic.claude-v2",
        Model::ClaudeV21 => "anthropic.claude-v2:1",
        Model::Custom(id) => return Some(id.clone()),
        _ => return None,
    };
    Some(id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claude_instant_mapping() {
        let id = to_bedrock_model_id(&Model::ClaudeInstantV1).unwrap();
        assert_eq!(id, "anthropic.claude-instant-v1");
    }

    #[test]
    fn test_claude_v2_mapping() {
        let id = to_bedrock_model_id(&Model::ClaudeV2).unwrap();
        assert_eq!(id, "anthropic.claude-v2");
        let id = to_bedrock_model_id(&Model::ClaudeV21).unwrap();
        assert_eq!(id, "anthropic.claude-v2:1");
    }

    #[test]
    fn test_custom_model_passthrough() {
        let model = Model::Custom("anthropic.claude-3-haiku-20240307-v1:0".to_string());
        let id = to_bedrock_model_id(&model).unwrap();
        assert_eq!(id, "anthropic.claude-3-haiku-20240307-v1:0");
    }

    #[test]
    fn test_unsupported_gpt_model() {
        assert!(to_bedrock_model_id(&Model::Gpt35Turbo).is_none());
        assert!(to_bedrock_model_id(&Model::Gpt4).is_none());
    }
}
