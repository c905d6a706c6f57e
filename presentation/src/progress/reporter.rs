//! Progress reporting for a run

use crate::output::console::{AWAITING_MESSAGE, CLEAR_LINE, ConsoleFormatter};
use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use sages_application::ports::progress::ProgressNotifier;
use sages_domain::{AnswerPair, Model, Phase, Slot};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

/// What a run echoes to stdout as it arrives.
///
/// `answers` prints both sages' answers before the synthesis starts,
/// `stream` prints the final opinion chunk by chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LiveEcho {
    pub answers: bool,
    pub stream: bool,
}

impl LiveEcho {
    fn print_answers(&self, answers: &AnswerPair) {
        if self.answers {
            print!("{}", ConsoleFormatter::format_answers(answers));
            println!("{}", AWAITING_MESSAGE);
        }
    }

    fn chunk(&self, chunk: &str) {
        if self.stream {
            let mut stdout = std::io::stdout().lock();
            let _ = stdout.write_all(chunk.as_bytes());
            let _ = stdout.flush();
        }
    }

    fn end(&self) {
        if self.stream {
            println!();
        }
    }
}

/// Reports progress with one spinner per sage
pub struct ProgressReporter {
    multi: MultiProgress,
    // `None` is the synthesizer
    bars: Mutex<HashMap<Option<Slot>, ProgressBar>>,
    echo: LiveEcho,
}

impl ProgressReporter {
    pub fn new(echo: LiveEcho) -> Self {
        Self {
            multi: MultiProgress::new(),
            bars: Mutex::new(HashMap::new()),
            echo,
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn start_spinner(&self, slot: Option<Slot>, message: String) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bars) = self.bars.lock() {
            if let Some(previous) = bars.insert(slot, pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn take_spinner(&self, slot: Option<Slot>) -> Option<ProgressBar> {
        self.bars.lock().ok().and_then(|mut bars| bars.remove(&slot))
    }

    /// Stop every spinner still ticking.
    fn clear_remaining(&self) {
        if let Ok(mut bars) = self.bars.lock() {
            for (_, pb) in bars.drain() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_phase_start(&self, _phase: Phase, _total_tasks: usize) {}

    fn on_task_start(&self, phase: Phase, slot: Option<Slot>, model: &Model) {
        match phase {
            Phase::FanOut => self.start_spinner(slot, format!("Sending to {}...", model)),
            // A live stream replaces the spinner.
            Phase::Synthesis if !self.echo.stream => {
                self.start_spinner(slot, format!("{} ({})", AWAITING_MESSAGE, model))
            }
            Phase::Synthesis => {}
        }
    }

    fn on_task_complete(&self, phase: Phase, slot: Option<Slot>, model: &Model, success: bool) {
        let Some(pb) = self.take_spinner(slot) else {
            return;
        };

        match (phase, success) {
            (Phase::FanOut, true) => {
                pb.finish_with_message(format!("{} is expressed!!!", model.to_string().green()))
            }
            (_, false) => {
                pb.finish_with_message(format!("{} failed", model.to_string().red()));
                self.clear_remaining();
            }
            (Phase::Synthesis, true) => pb.finish_and_clear(),
        }
    }

    fn on_phase_complete(&self, _phase: Phase) {}

    fn on_answers_ready(&self, answers: &AnswerPair) {
        self.echo.print_answers(answers);
    }

    fn on_stream_chunk(&self, _model: &Model, chunk: &str) {
        self.echo.chunk(chunk);
    }

    fn on_stream_end(&self, _model: &Model) {
        self.echo.end();
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress {
    echo: LiveEcho,
}

impl SimpleProgress {
    pub fn new(echo: LiveEcho) -> Self {
        Self { echo }
    }
}

impl ProgressNotifier for SimpleProgress {
    fn on_phase_start(&self, _phase: Phase, _total_tasks: usize) {}

    fn on_task_start(&self, phase: Phase, _slot: Option<Slot>, model: &Model) {
        if phase == Phase::FanOut {
            println!("Sending to {}...", model);
        }
    }

    fn on_task_complete(&self, phase: Phase, _slot: Option<Slot>, model: &Model, success: bool) {
        match (phase, success) {
            (Phase::FanOut, true) => println!("{} is expressed!!!", model),
            (_, false) => println!("{} failed", model),
            (Phase::Synthesis, true) => {}
        }
    }

    fn on_phase_complete(&self, phase: Phase) {
        if phase == Phase::FanOut {
            print!("{}", CLEAR_LINE);
        }
    }

    fn on_answers_ready(&self, answers: &AnswerPair) {
        self.echo.print_answers(answers);
    }

    fn on_stream_chunk(&self, _model: &Model, chunk: &str) {
        self.echo.chunk(chunk);
    }

    fn on_stream_end(&self, _model: &Model) {
        self.echo.end();
    }
}
