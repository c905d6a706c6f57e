//! Prompt input

use std::io::{self, BufRead, Write};

pub const PROMPT_LABEL: &str = "Enter your prompt: ";

/// Ask for the prompt on `output` and read one line from `input`.
///
/// The whole line is the prompt, spaces included. The line ending is
/// stripped; end of input yields an empty prompt.
pub fn read_prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<String> {
    write!(output, "{}", PROMPT_LABEL)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let trimmed = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(trimmed);
    Ok(line)
}
