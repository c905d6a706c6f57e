//! Progress notification port
//!
//! Defines the interface for reporting progress during a run.

use sages_domain::{AnswerPair, Model, Phase, Slot};

/// Callback for progress updates during a run
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (spinners, plain text, nothing at all).
pub trait ProgressNotifier: Send + Sync {
    /// Called when a phase starts
    fn on_phase_start(&self, phase: Phase, total_tasks: usize);

    /// Called right before a model is asked. `slot` is `None` for the
    /// synthesizer.
    fn on_task_start(&self, _phase: Phase, _slot: Option<Slot>, _model: &Model) {}

    /// Called when a task completes within a phase
    fn on_task_complete(
        &self,
        phase: Phase,
        slot: Option<Slot>,
        model: &Model,
        success: bool,
    );

    /// Called when a phase completes
    fn on_phase_complete(&self, phase: Phase);

    /// Called once both sages have answered, before the synthesis starts
    fn on_answers_ready(&self, _answers: &AnswerPair) {}

    // ==================== Stream Callbacks ====================

    /// Called for each text chunk from the synthesizer, in arrival order.
    fn on_stream_chunk(&self, _model: &Model, _chunk: &str) {}

    /// Called when the synthesizer's stream ends successfully.
    fn on_stream_end(&self, _model: &Model) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl ProgressNotifier for NoProgress {
    fn on_phase_start(&self, _phase: Phase, _total_tasks: usize) {}
    fn on_task_complete(
        &self,
        _phase: Phase,
        _slot: Option<Slot>,
        _model: &Model,
        _success: bool,
    ) {
    }
    fn on_phase_complete(&self, _phase: Phase) {}
}
