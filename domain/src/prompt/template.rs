//! Prompt templates for the two-sages flow

use crate::core::model::Model;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// Preamble asking the model to open with a clear 賛成 (agree) or
    /// 反対 (disagree) before giving its reasons.
    pub const ADVISORY_PREAMBLE: &'static str = "あなたは答えが1つには決まらない問題に対して、一つの視点を提供するアドバイザーとしての役割を持っています。なので、以下の質問に対して、必ず最初に「賛成」または「反対」のどちらかの立場を表明してください。最初に賛成であるか反対であるかを明示し、その後に理由を述べてください。\n";

    /// Preamble for the synthesizer: hold a final position while weighing
    /// the opinions of the two sages (賢者A / 賢者B).
    ///
    /// `{final_answer}` is sent literally; nothing fills it in.
    pub const SYNTHESIS_PREAMBLE: &'static str = "あなたは答えが1つには決まらない問題に対して、一つの視点を提供するアドバイザーとしての役割を持っています。あなたは以下の問題に対して{final_answer}であるという立場を動かさずに、以下の2人の賢者の意見を参考にし、尚且つ自身の意見も踏まえて「賛成」または「反対」のどちらかの立場を明確にしてください。";

    /// Turn delimiters of the Anthropic text-completion format
    pub const HUMAN_MARKER: &'static str = "\n\nHuman: ";
    pub const ASSISTANT_MARKER: &'static str = "\n\nAssistant:";

    /// User prompt for the two sages
    pub fn advisory(question: &str) -> String {
        format!("{}{}", Self::ADVISORY_PREAMBLE, question)
    }

    /// Wrap text in a single Human/Assistant turn
    pub fn human_turn(text: &str) -> String {
        format!("{}{}{}", Self::HUMAN_MARKER, text, Self::ASSISTANT_MARKER)
    }

    /// Introduces the two sages by name after the synthesis preamble
    pub fn sages_header(first: &Model, second: &Model) -> String {
        format!(
            "賢者Aの意見: {},賢者Bの意見: {}",
            first.display_name(),
            second.display_name()
        )
    }

    /// Both answers, verbatim, each labelled with its source model
    pub fn labelled_answers(first: (&Model, &str), second: (&Model, &str)) -> String {
        format!(
            "{}: {}\n\n{}: {}",
            first.0.display_name(),
            first.1,
            second.0.display_name(),
            second.1
        )
    }

    /// Full synthesis prompt, already wrapped in the turn template
    pub fn synthesis_prompt(first: (&Model, &str), second: (&Model, &str)) -> String {
        let body = format!(
            "{}{}{}",
            Self::SYNTHESIS_PREAMBLE,
            Self::sages_header(first.0, second.0),
            Self::labelled_answers(first, second)
        );
        Self::human_turn(&body)
    }
}
