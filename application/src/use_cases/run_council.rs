//! Run Council use case
//!
//! Orchestrates the full flow: ask both sages in parallel, then stream the
//! synthesizer's final opinion over their answers.

use crate::config::BehaviorConfig;
use crate::ports::llm_gateway::{AnswerProvider, GatewayError, StreamingProvider};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::use_cases::fan_out::{FanOutCoordinator, FanOutError};
use sages_domain::{
    AnswerPair, CompletionRequest, CouncilResult, Phase, Prompt, PromptTemplate, SynthesisResult,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during a run
#[derive(Error, Debug)]
pub enum RunCouncilError {
    #[error(transparent)]
    FanOut(#[from] FanOutError),

    #[error("Synthesis failed: {0}")]
    Synthesis(#[source] GatewayError),

    #[error("Operation cancelled")]
    Cancelled,
}

impl RunCouncilError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        match self {
            RunCouncilError::Cancelled => true,
            RunCouncilError::FanOut(e) => e.is_cancelled(),
            RunCouncilError::Synthesis(e) => e.is_cancelled(),
        }
    }
}

/// Input for the RunCouncil use case
#[derive(Debug, Clone)]
pub struct RunCouncilInput {
    /// The prompt sent to both sages
    pub prompt: Prompt,
    /// Pause between the fan-out and the synthesis
    pub synthesis_delay: Duration,
    /// `max_tokens_to_sample` for the synthesis request
    pub max_tokens: u32,
    /// Cancels the run between steps and between stream events
    pub cancellation: CancellationToken,
}

impl RunCouncilInput {
    pub fn new(question: impl Into<String>) -> Self {
        let behavior = BehaviorConfig::default();
        Self {
            prompt: Prompt::advisory(question),
            synthesis_delay: behavior.synthesis_delay,
            max_tokens: behavior.max_tokens_to_sample,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_behavior(mut self, behavior: &BehaviorConfig) -> Self {
        self.synthesis_delay = behavior.synthesis_delay;
        self.max_tokens = behavior.max_tokens_to_sample;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }
}

/// Use case for running the two sages and the synthesizer
pub struct RunCouncilUseCase {
    fan_out: FanOutCoordinator,
    synthesizer: Arc<dyn StreamingProvider>,
}

impl RunCouncilUseCase {
    pub fn new(
        first: Arc<dyn AnswerProvider>,
        second: Arc<dyn AnswerProvider>,
        synthesizer: Arc<dyn StreamingProvider>,
    ) -> Self {
        Self {
            fan_out: FanOutCoordinator::new(first, second),
            synthesizer,
        }
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, input: RunCouncilInput) -> Result<CouncilResult, RunCouncilError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Execute the use case with progress callbacks
    pub async fn execute_with_progress(
        &self,
        input: RunCouncilInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<CouncilResult, RunCouncilError> {
        info!(question = %input.prompt, "Starting run");

        // Phase 1: both sages answer
        let answers = self
            .fan_out
            .ask(&input.prompt, progress, &input.cancellation)
            .await?;
        progress.on_answers_ready(&answers);

        Self::pause(input.synthesis_delay, &input.cancellation).await?;

        // Phase 2: streamed synthesis
        let synthesis = self.phase_synthesis(&input, &answers, progress).await?;

        Ok(CouncilResult::new(
            input.prompt.question(),
            answers,
            synthesis,
        ))
    }

    async fn pause(delay: Duration, cancellation: &CancellationToken) -> Result<(), RunCouncilError> {
        if delay.is_zero() {
            return Ok(());
        }
        debug!(?delay, "Waiting before synthesis");
        tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(RunCouncilError::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }

    /// Build the synthesis request from both answers
    pub fn synthesis_request(answers: &AnswerPair, max_tokens: u32) -> CompletionRequest {
        let prompt = PromptTemplate::synthesis_prompt(
            (&answers.first.model, &answers.first.content),
            (&answers.second.model, &answers.second.content),
        );
        CompletionRequest::new(prompt).with_max_tokens(max_tokens)
    }

    async fn phase_synthesis(
        &self,
        input: &RunCouncilInput,
        answers: &AnswerPair,
        progress: &dyn ProgressNotifier,
    ) -> Result<SynthesisResult, RunCouncilError> {
        let moderator = self.synthesizer.model().clone();
        info!(model = %moderator, "Requesting final opinion");
        progress.on_phase_start(Phase::Synthesis, 1);
        progress.on_task_start(Phase::Synthesis, None, &moderator);

        let request = Self::synthesis_request(answers, input.max_tokens);

        let outcome = match self.synthesizer.stream(&request).await {
            Ok(handle) => {
                handle
                    .accumulate(
                        |chunk| progress.on_stream_chunk(&moderator, chunk),
                        &input.cancellation,
                    )
                    .await
            }
            Err(e) => Err(e),
        };

        let summary = match outcome {
            Ok(summary) => summary,
            Err(GatewayError::Cancelled) => return Err(RunCouncilError::Cancelled),
            Err(e) => {
                warn!(model = %moderator, "Synthesis failed: {}", e);
                progress.on_task_complete(Phase::Synthesis, None, &moderator, false);
                return Err(RunCouncilError::Synthesis(e));
            }
        };

        progress.on_stream_end(&moderator);
        progress.on_task_complete(Phase::Synthesis, None, &moderator, true);
        progress.on_phase_complete(Phase::Synthesis);

        Ok(SynthesisResult::new(
            moderator,
            summary.response.completion,
            summary.chunks,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::StreamHandle;
    use async_trait::async_trait;
    use sages_domain::{Model, Slot, StreamEvent};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Test Mocks ====================

    struct MockAnswerProvider {
        model: Model,
        reply: Result<String, String>,
    }

    #[async_trait]
    impl AnswerProvider for MockAnswerProvider {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn answer(&self, _prompt: &str) -> Result<String, GatewayError> {
            self.reply.clone().map_err(GatewayError::ConnectionError)
        }
    }

    struct MockStreamingProvider {
        model: Model,
        events: Mutex<Option<Vec<StreamEvent>>>,
        calls: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockStreamingProvider {
        fn new(events: Vec<StreamEvent>) -> Self {
            Self {
                model: Model::ClaudeV2,
                events: Mutex::new(Some(events)),
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StreamingProvider for MockStreamingProvider {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn stream(&self, request: &CompletionRequest) -> Result<StreamHandle, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let events = self
                .events
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| GatewayError::RequestFailed("stream already taken".to_string()))?;
            Ok(StreamHandle::from_events(events))
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        chunks: Mutex<Vec<String>>,
        answers_ready: AtomicUsize,
    }

    impl ProgressNotifier for RecordingProgress {
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
        fn on_answers_ready(&self, _answers: &AnswerPair) {
            self.answers_ready.fetch_add(1, Ordering::SeqCst);
        }
        fn on_stream_chunk(&self, _model: &Model, chunk: &str) {
            self.chunks.lock().unwrap().push(chunk.to_string());
        }
    }

    fn chunk(text: &str) -> StreamEvent {
        let body = serde_json::json!({ "completion": text });
        StreamEvent::chunk(serde_json::to_vec(&body).unwrap())
    }

    fn sage(model: Model, reply: Result<&str, &str>) -> Arc<MockAnswerProvider> {
        Arc::new(MockAnswerProvider {
            model,
            reply: reply.map(str::to_string).map_err(str::to_string),
        })
    }

    fn input(question: &str) -> RunCouncilInput {
        RunCouncilInput::new(question)
            .with_behavior(&BehaviorConfig::default().with_synthesis_delay_ms(0))
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_end_to_end_pineapple() {
        let synthesizer = Arc::new(MockStreamingProvider::new(vec![
            chunk("私は"),
            chunk("賛成"),
            chunk("です。"),
        ]));
        let use_case = RunCouncilUseCase::new(
            sage(Model::Gpt35Turbo, Ok("賛成...")),
            sage(Model::ClaudeInstantV1, Ok("反対...")),
            synthesizer.clone(),
        );
        let progress = RecordingProgress::default();

        let result = use_case
            .execute_with_progress(input("Should pineapple go on pizza?"), &progress)
            .await
            .unwrap();

        assert_eq!(result.question, "Should pineapple go on pizza?");
        assert_eq!(result.answers.first.content, "賛成...");
        assert_eq!(result.answers.second.content, "反対...");
        assert_eq!(result.synthesis.moderator, Model::ClaudeV2);
        assert_eq!(result.synthesis.conclusion, "私は賛成です。");
        assert_eq!(result.synthesis.chunks, 3);

        let printed = progress.chunks.lock().unwrap().concat();
        assert_eq!(printed, result.synthesis.conclusion);
        assert_eq!(progress.answers_ready.load(Ordering::SeqCst), 1);

        let requests = synthesizer.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens_to_sample, 2048);
        assert!(requests[0].prompt.contains("GPT-3.5 Turbo: 賛成..."));
        assert!(requests[0].prompt.contains("Claude Instant: 反対..."));
        assert!(requests[0].prompt.starts_with("\n\nHuman: "));
        assert!(requests[0].prompt.ends_with("\n\nAssistant:"));
    }

    #[tokio::test]
    async fn test_failed_sage_never_reaches_synthesis() {
        let synthesizer = Arc::new(MockStreamingProvider::new(vec![chunk("unused")]));
        let use_case = RunCouncilUseCase::new(
            sage(Model::Gpt35Turbo, Err("dial tcp: connection refused")),
            sage(Model::ClaudeInstantV1, Ok("反対...")),
            synthesizer.clone(),
        );

        let err = use_case.execute(input("q")).await.unwrap_err();

        assert!(matches!(err, RunCouncilError::FanOut(FanOutError::Provider { .. })));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_event_is_ignored() {
        let synthesizer = Arc::new(MockStreamingProvider::new(vec![
            chunk("single chunk"),
            StreamEvent::Unknown("unknown-tag".to_string()),
        ]));
        let use_case = RunCouncilUseCase::new(
            sage(Model::Gpt35Turbo, Ok("A")),
            sage(Model::ClaudeInstantV1, Ok("B")),
            synthesizer,
        );

        let result = use_case.execute(input("q")).await.unwrap();

        assert_eq!(result.synthesis.conclusion, "single chunk");
        assert_eq!(result.synthesis.chunks, 1);
    }

    #[tokio::test]
    async fn test_decode_error_fails_the_run() {
        let synthesizer = Arc::new(MockStreamingProvider::new(vec![
            chunk("partial"),
            StreamEvent::chunk(b"<html>".to_vec()),
        ]));
        let use_case = RunCouncilUseCase::new(
            sage(Model::Gpt35Turbo, Ok("A")),
            sage(Model::ClaudeInstantV1, Ok("B")),
            synthesizer,
        );

        let err = use_case.execute(input("q")).await.unwrap_err();

        assert!(matches!(
            err,
            RunCouncilError::Synthesis(GatewayError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_cancelled_during_pause() {
        let synthesizer = Arc::new(MockStreamingProvider::new(vec![chunk("unused")]));
        let use_case = RunCouncilUseCase::new(
            sage(Model::Gpt35Turbo, Ok("A")),
            sage(Model::ClaudeInstantV1, Ok("B")),
            synthesizer.clone(),
        );
        let token = CancellationToken::new();
        let run_input = RunCouncilInput::new("q")
            .with_behavior(&BehaviorConfig::default().with_synthesis_delay_ms(60_000))
            .with_cancellation(token.clone());

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = use_case.execute(run_input).await.unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_synthesis_request_uses_max_tokens() {
        let answers = AnswerPair::new(
            sages_domain::Answer::new(Model::Gpt35Turbo, "A"),
            sages_domain::Answer::new(Model::ClaudeInstantV1, "B"),
        );
        let request = RunCouncilUseCase::synthesis_request(&answers, 512);
        assert_eq!(request.max_tokens_to_sample, 512);
        assert!(request.temperature.is_none());
    }
}
