//! Presentation layer for two-sages
//!
//! This crate contains CLI definitions, prompt input, output formatters
//! and progress reporters.

pub mod cli;
pub mod input;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use input::read_prompt;
pub use output::console::ConsoleFormatter;
pub use progress::reporter::{LiveEcho, ProgressReporter, SimpleProgress};
