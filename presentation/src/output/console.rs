//! Console output formatter for run results

use colored::Colorize;
use sages_domain::{Answer, AnswerPair, CouncilResult};

/// Separator printed around each answer
pub const SEPARATOR_WIDTH: usize = 50;

/// Clears the current terminal line and returns the cursor to column 0
pub const CLEAR_LINE: &str = "\x1b[2K\r";

pub const AWAITING_MESSAGE: &str = "Awaiting final opinions...";

/// Formats run results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Both answers between separator lines, each under its model name
    pub fn format_answers(answers: &AnswerPair) -> String {
        let mut output = String::new();

        output.push_str(&Self::separator());
        for answer in answers.iter() {
            output.push_str(&Self::format_answer(answer));
            output.push_str(&Self::separator());
        }

        output
    }

    fn format_answer(answer: &Answer) -> String {
        format!(
            "{}\n{}\n",
            format!("{}:", answer.model).yellow().bold(),
            answer.content
        )
    }

    /// Format the complete result, for runs where nothing was echoed live
    pub fn format(result: &CouncilResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Question:".cyan().bold(),
            result.question
        ));
        output.push_str(&Self::format_answers(&result.answers));
        output.push_str(&format!(
            "{}\n{}\n",
            format!("{}:", result.synthesis.moderator).green().bold(),
            result.synthesis.conclusion
        ));

        output
    }

    /// Format as JSON
    pub fn format_json(result: &CouncilResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format the final opinion only
    pub fn format_synthesis_only(result: &CouncilResult) -> String {
        format!("{}\n", result.synthesis.conclusion)
    }

    fn separator() -> String {
        format!("{}\n", "-".repeat(SEPARATOR_WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sages_domain::{Model, SynthesisResult};

    fn sample() -> CouncilResult {
        CouncilResult::new(
            "Should pineapple go on pizza?",
            AnswerPair::new(
                Answer::new(Model::Gpt35Turbo, "賛成..."),
                Answer::new(Model::ClaudeInstantV1, "反対..."),
            ),
            SynthesisResult::new(Model::ClaudeV2, "賛成です。", 3),
        )
    }

    #[test]
    fn test_answers_between_separators() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format_answers(&sample().answers);
        let separator = "-".repeat(50);

        assert_eq!(
            text,
            format!(
                "{separator}\nGPT-3.5 Turbo:\n賛成...\n{separator}\nClaude Instant:\n反対...\n{separator}\n"
            )
        );
    }

    #[test]
    fn test_full_format_contains_everything() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&sample());

        assert!(text.starts_with("Question: Should pineapple go on pizza?\n"));
        assert!(text.contains("GPT-3.5 Turbo:\n賛成..."));
        assert!(text.contains("Claude Instant:\n反対..."));
        assert!(text.ends_with("Claude2:\n賛成です。\n"));
    }

    #[test]
    fn test_synthesis_only() {
        assert_eq!(ConsoleFormatter::format_synthesis_only(&sample()), "賛成です。\n");
    }

    #[test]
    fn test_json_round_trips() {
        let json = ConsoleFormatter::format_json(&sample());
        let parsed: CouncilResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample());
    }
}
