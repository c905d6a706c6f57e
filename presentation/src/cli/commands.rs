//! CLI command definitions

use crate::progress::reporter::LiveEcho;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Both answers, then the streamed final opinion
    Full,
    /// Only the final opinion
    Synthesis,
    /// JSON output
    Json,
}

/// CLI arguments for two-sages
#[derive(Parser, Debug)]
#[command(name = "two-sages")]
#[command(author, version, about = "Ask two LLM sages, then let a third give the final opinion")]
#[command(long_about = r#"
two-sages sends your prompt to two models at once, prints both answers,
and streams a third model's final opinion over them.

The run has two phases:
1. Fan-out: GPT-3.5 Turbo and Claude Instant answer in parallel
2. Synthesis: Claude 2 weighs both answers and streams its verdict

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./sages.toml        Project-level config
3. ~/.config/two-sages/config.toml   Global config

Credentials come from OPENAI_API_KEY and the standard AWS chain
(AWS_REGION, AWS_PROFILE). A .env file in the working directory is loaded
first.

Example:
  two-sages "Should pineapple go on pizza?"
  echo "Tabs or spaces?" | two-sages -o synthesis
"#)]
pub struct Cli {
    /// The prompt to send (read from stdin when omitted)
    pub prompt: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "full")]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Plain progress lines instead of spinners
    #[arg(long)]
    pub plain: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Console output echoes the final opinion as it streams; full output
    /// also echoes both answers first. Quiet and JSON runs print at the end.
    pub fn live_echo(&self) -> LiveEcho {
        LiveEcho {
            answers: self.output == OutputFormat::Full && !self.quiet,
            stream: self.output != OutputFormat::Json && !self.quiet,
        }
    }

    /// JSON must stay parseable, so it never shares stdout with progress.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output != OutputFormat::Json
    }

    /// `tracing` filter directive for the `-v` count
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("two-sages").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&[]);
        assert!(cli.prompt.is_none());
        assert_eq!(cli.output, OutputFormat::Full);
        assert_eq!(
            cli.live_echo(),
            LiveEcho {
                answers: true,
                stream: true
            }
        );
        assert!(cli.show_progress());
        assert_eq!(cli.log_level(), "warn");
    }

    #[test]
    fn test_positional_prompt_and_flags() {
        let cli = parse(&["-vv", "--plain", "-o", "synthesis", "Tabs or spaces?"]);
        assert_eq!(cli.prompt.as_deref(), Some("Tabs or spaces?"));
        assert_eq!(cli.output, OutputFormat::Synthesis);
        assert!(cli.plain);
        assert_eq!(cli.log_level(), "debug");
    }

    #[test]
    fn test_synthesis_output_streams_live() {
        let cli = parse(&["-o", "synthesis", "Tabs or spaces?"]);
        let echo = cli.live_echo();
        assert!(echo.stream);
        assert!(!echo.answers);
        assert!(cli.show_progress());
    }

    #[test]
    fn test_json_hides_progress() {
        let cli = parse(&["--output", "json"]);
        assert!(!cli.show_progress());
        assert_eq!(cli.live_echo(), LiveEcho::default());
    }

    #[test]
    fn test_quiet_disables_live_output() {
        let cli = parse(&["-q"]);
        assert!(!cli.show_progress());
        assert_eq!(cli.live_echo(), LiveEcho::default());

        let cli = parse(&["-q", "-o", "synthesis"]);
        assert_eq!(cli.live_echo(), LiveEcho::default());
    }

    #[test]
    fn test_unknown_output_is_rejected() {
        let result = Cli::try_parse_from(["two-sages", "-o", "yaml"]);
        assert!(result.is_err());
    }
}
