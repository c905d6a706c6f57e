//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave.

use sages_domain::DEFAULT_MAX_TOKENS_TO_SAMPLE;
use std::time::Duration;

/// Pause between printing the answers and asking for the final opinion.
pub const DEFAULT_SYNTHESIS_DELAY: Duration = Duration::from_secs(2);

/// Application behavior configuration.
#[derive(Debug, Clone)]
pub struct BehaviorConfig {
    /// How long to wait after the fan-out before starting the synthesis.
    pub synthesis_delay: Duration,
    /// `max_tokens_to_sample` for the synthesis request.
    pub max_tokens_to_sample: u32,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            synthesis_delay: DEFAULT_SYNTHESIS_DELAY,
            max_tokens_to_sample: DEFAULT_MAX_TOKENS_TO_SAMPLE,
        }
    }
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig with the delay specified in milliseconds.
    pub fn with_synthesis_delay_ms(mut self, millis: u64) -> Self {
        self.synthesis_delay = Duration::from_millis(millis);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens_to_sample = max_tokens;
        self
    }
}
