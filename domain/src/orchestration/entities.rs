//! Orchestration domain entities

use serde::{Deserialize, Serialize};

/// Phase of a two-sages run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Both sages answer the prompt in parallel
    FanOut,
    /// The synthesizer streams a combined opinion
    Synthesis,
}

/// Which sage an answer belongs to.
///
/// The slot is fixed by the provider, never by completion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub fn label(&self) -> &str {
        match self {
            Slot::First => "A",
            Slot::Second => "B",
        }
    }
}
