//! Model value object representing an LLM model

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Available LLM models (Value Object)
///
/// The two sages and the synthesizer are each one of these. Anything not
/// listed is carried through as [`Model::Custom`] and passed to the
/// provider verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    // OpenAI chat models
    Gpt35Turbo,
    Gpt4,
    // Anthropic text-completion models
    ClaudeInstantV1,
    ClaudeV2,
    ClaudeV21,
    // Custom
    Custom(String),
}

impl Model {
    /// Get the string identifier for this model
    pub fn as_str(&self) -> &str {
        match self {
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::Gpt4 => "gpt-4",
            Model::ClaudeInstantV1 => "claude-instant-v1",
            Model::ClaudeV2 => "claude-v2",
            Model::ClaudeV21 => "claude-v2.1",
            Model::Custom(s) => s,
        }
    }

    /// Human-readable label, used both on screen and to attribute each
    /// answer inside the synthesis prompt.
    pub fn display_name(&self) -> &str {
        match self {
            Model::Gpt35Turbo => "GPT-3.5 Turbo",
            Model::Gpt4 => "GPT-4",
            Model::ClaudeInstantV1 => "Claude Instant",
            Model::ClaudeV2 => "Claude2",
            Model::ClaudeV21 => "Claude 2.1",
            Model::Custom(s) => s,
        }
    }

    /// Default chat-completion sage
    pub fn default_first() -> Model {
        Model::Gpt35Turbo
    }

    /// Default single-shot sage
    pub fn default_second() -> Model {
        Model::ClaudeInstantV1
    }

    /// Default streaming synthesizer
    pub fn default_synthesizer() -> Model {
        Model::ClaudeV2
    }

    /// Check if this is a Claude model
    pub fn is_claude(&self) -> bool {
        matches!(
            self,
            Model::ClaudeInstantV1 | Model::ClaudeV2 | Model::ClaudeV21
        )
    }

    /// Check if this is a GPT model
    pub fn is_gpt(&self) -> bool {
        matches!(self, Model::Gpt35Turbo | Model::Gpt4)
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "gpt-3.5-turbo" => Model::Gpt35Turbo,
            "gpt-4" => Model::Gpt4,
            "claude-instant-v1" => Model::ClaudeInstantV1,
            "claude-v2" => Model::ClaudeV2,
            "claude-v2.1" => Model::ClaudeV21,
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<&str> for Model {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(model) => model,
            Err(never) => match never {},
        }
    }
}

impl Serialize for Model {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Model::from(s.as_str()))
    }
}
