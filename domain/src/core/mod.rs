//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - the models taking part in a run
//! - [`prompt::Prompt`] - the user's question with the advisory preamble

pub mod model;
pub mod prompt;
