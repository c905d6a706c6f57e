//! Fan-out coordinator
//!
//! Asks both sages the same prompt at the same time and waits for both.

use crate::ports::llm_gateway::{AnswerProvider, GatewayError};
use crate::ports::progress::ProgressNotifier;
use sages_domain::{Answer, AnswerPair, Model, Phase, Prompt, Slot};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur during the fan-out
#[derive(Error, Debug)]
pub enum FanOutError {
    #[error("{model} (sage {}) failed: {source}", .slot.label())]
    Provider {
        slot: Slot,
        model: Model,
        #[source]
        source: GatewayError,
    },

    #[error("Fan-out task failed: {0}")]
    Join(String),

    #[error("Operation cancelled")]
    Cancelled,
}

impl FanOutError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FanOutError::Cancelled)
    }
}

/// Launches both answer providers concurrently and joins their results.
///
/// Both answers are required: the first failure aborts the other call and
/// no pair is produced. There is no timeout; a provider that never returns
/// holds the coordinator until the cancellation token fires.
pub struct FanOutCoordinator {
    first: Arc<dyn AnswerProvider>,
    second: Arc<dyn AnswerProvider>,
}

impl FanOutCoordinator {
    pub fn new(first: Arc<dyn AnswerProvider>, second: Arc<dyn AnswerProvider>) -> Self {
        Self { first, second }
    }

    fn provider(&self, slot: Slot) -> &Arc<dyn AnswerProvider> {
        match slot {
            Slot::First => &self.first,
            Slot::Second => &self.second,
        }
    }

    /// Ask both providers and return their answers in provider order.
    pub async fn ask(
        &self,
        prompt: &Prompt,
        progress: &dyn ProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<AnswerPair, FanOutError> {
        if cancellation.is_cancelled() {
            return Err(FanOutError::Cancelled);
        }

        info!("Asking both sages");
        progress.on_phase_start(Phase::FanOut, 2);

        let mut join_set = JoinSet::new();

        for slot in [Slot::First, Slot::Second] {
            let provider = Arc::clone(self.provider(slot));
            let text = prompt.text().to_string();

            progress.on_task_start(Phase::FanOut, Some(slot), provider.model());
            debug!(model = %provider.model(), sage = slot.label(), "Sending prompt");

            join_set.spawn(async move {
                let result = provider.answer(&text).await;
                (slot, result)
            });
        }

        let mut first = None;
        let mut second = None;

        loop {
            let joined = tokio::select! {
                biased;
                _ = cancellation.cancelled() => None,
                joined = join_set.join_next() => Some(joined),
            };

            let Some(joined) = joined else {
                join_set.abort_all();
                warn!("Fan-out cancelled");
                return Err(FanOutError::Cancelled);
            };

            let Some(joined) = joined else {
                break;
            };

            let (slot, result) = joined.map_err(|e| FanOutError::Join(e.to_string()))?;
            let model = self.provider(slot).model().clone();

            match result {
                Ok(content) => {
                    info!(model = %model, bytes = content.len(), "Sage answered");
                    progress.on_task_complete(Phase::FanOut, Some(slot), &model, true);
                    let answer = Answer::new(model, content);
                    match slot {
                        Slot::First => first = Some(answer),
                        Slot::Second => second = Some(answer),
                    }
                }
                Err(source) => {
                    warn!(model = %model, "Sage failed: {}", source);
                    progress.on_task_complete(Phase::FanOut, Some(slot), &model, false);
                    join_set.abort_all();
                    return Err(FanOutError::Provider {
                        slot,
                        model,
                        source,
                    });
                }
            }
        }

        progress.on_phase_complete(Phase::FanOut);

        match (first, second) {
            (Some(first), Some(second)) => Ok(AnswerPair::new(first, second)),
            _ => Err(FanOutError::Join(
                "a fan-out task ended without reporting".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoProgress;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    // ==================== Test Mocks ====================

    struct MockAnswerProvider {
        model: Model,
        reply: Result<String, String>,
        delay: Duration,
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
    }

    impl MockAnswerProvider {
        fn ok(model: Model, reply: &str) -> Self {
            Self {
                model,
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn failing(model: Model, error: &str) -> Self {
            Self {
                reply: Err(error.to_string()),
                ..Self::ok(model, "")
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }
    }

    #[async_trait]
    impl AnswerProvider for MockAnswerProvider {
        fn model(&self) -> &Model {
            &self.model
        }

        async fn answer(&self, prompt: &str) -> Result<String, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply
                .clone()
                .map_err(GatewayError::ConnectionError)
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        started: Mutex<Vec<(Slot, Model)>>,
        completed: Mutex<Vec<(Slot, Model, bool)>>,
    }

    impl ProgressNotifier for RecordingProgress {
        fn on_phase_start(&self, _phase: Phase, _total_tasks: usize) {}
        fn on_task_start(&self, _phase: Phase, slot: Option<Slot>, model: &Model) {
            self.started.lock().unwrap().push((slot.unwrap(), model.clone()));
        }
        fn on_task_complete(
            &self,
            _phase: Phase,
            slot: Option<Slot>,
            model: &Model,
            success: bool,
        ) {
            self.completed
                .lock()
                .unwrap()
                .push((slot.unwrap(), model.clone(), success));
        }
        fn on_phase_complete(&self, _phase: Phase) {}
    }

    fn coordinator(
        first: MockAnswerProvider,
        second: MockAnswerProvider,
    ) -> (
        FanOutCoordinator,
        Arc<MockAnswerProvider>,
        Arc<MockAnswerProvider>,
    ) {
        let first = Arc::new(first);
        let second = Arc::new(second);
        (
            FanOutCoordinator::new(first.clone(), second.clone()),
            first,
            second,
        )
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_returns_both_answers() {
        let (fan_out, first, second) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "賛成..."),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "反対..."),
        );
        let prompt = Prompt::advisory("Should pineapple go on pizza?");

        let pair = fan_out
            .ask(&prompt, &NoProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(pair.first, Answer::new(Model::Gpt35Turbo, "賛成..."));
        assert_eq!(pair.second, Answer::new(Model::ClaudeInstantV1, "反対..."));
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.prompts.lock().unwrap()[0], prompt.text());
        assert_eq!(second.prompts.lock().unwrap()[0], prompt.text());
    }

    #[tokio::test]
    async fn test_completion_order_does_not_change_slots() {
        let (slow_first, _, _) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "A").with_delay(Duration::from_millis(50)),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "B"),
        );
        let (slow_second, _, _) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "A"),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "B").with_delay(Duration::from_millis(50)),
        );
        let prompt = Prompt::advisory("q");
        let token = CancellationToken::new();

        let a = slow_first.ask(&prompt, &NoProgress, &token).await.unwrap();
        let b = slow_second.ask(&prompt, &NoProgress, &token).await.unwrap();

        assert_eq!(a, b);
        assert_eq!(a.first.content, "A");
        assert_eq!(a.second.content, "B");
    }

    #[tokio::test]
    async fn test_providers_run_concurrently() {
        let delay = Duration::from_millis(200);
        let (fan_out, _, _) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "A").with_delay(delay),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "B").with_delay(delay),
        );

        let started = std::time::Instant::now();
        fan_out
            .ask(&Prompt::advisory("q"), &NoProgress, &CancellationToken::new())
            .await
            .unwrap();

        assert!(started.elapsed() < delay * 2);
    }

    #[tokio::test]
    async fn test_first_failure_aborts_the_pair() {
        let progress = RecordingProgress::default();
        let (fan_out, _, _) = coordinator(
            MockAnswerProvider::failing(Model::Gpt35Turbo, "connection refused"),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "B").with_delay(Duration::from_secs(30)),
        );

        let err = fan_out
            .ask(&Prompt::advisory("q"), &progress, &CancellationToken::new())
            .await
            .unwrap_err();

        match err {
            FanOutError::Provider { slot, model, source } => {
                assert_eq!(slot, Slot::First);
                assert_eq!(model, Model::Gpt35Turbo);
                assert!(source.to_string().contains("connection refused"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(
            *progress.completed.lock().unwrap(),
            vec![(Slot::First, Model::Gpt35Turbo, false)]
        );
    }

    #[tokio::test]
    async fn test_same_model_reports_each_slot() {
        let progress = RecordingProgress::default();
        let (fan_out, _, _) = coordinator(
            MockAnswerProvider::ok(Model::ClaudeV2, "A"),
            MockAnswerProvider::ok(Model::ClaudeV2, "B").with_delay(Duration::from_millis(20)),
        );

        fan_out
            .ask(&Prompt::advisory("q"), &progress, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            *progress.started.lock().unwrap(),
            vec![(Slot::First, Model::ClaudeV2), (Slot::Second, Model::ClaudeV2)]
        );
        assert_eq!(
            *progress.completed.lock().unwrap(),
            vec![
                (Slot::First, Model::ClaudeV2, true),
                (Slot::Second, Model::ClaudeV2, true)
            ]
        );
    }

    #[tokio::test]
    async fn test_second_failure_aborts_the_pair() {
        let (fan_out, _, _) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "A"),
            MockAnswerProvider::failing(Model::ClaudeInstantV1, "throttled"),
        );

        let err = fan_out
            .ask(&Prompt::advisory("q"), &NoProgress, &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FanOutError::Provider {
                slot: Slot::Second,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_already_cancelled_never_calls_providers() {
        let (fan_out, first, second) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "A"),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "B"),
        );
        let token = CancellationToken::new();
        token.cancel();

        let err = fan_out
            .ask(&Prompt::advisory("q"), &NoProgress, &token)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancellation_releases_a_hung_provider() {
        let (fan_out, _, _) = coordinator(
            MockAnswerProvider::ok(Model::Gpt35Turbo, "A").with_delay(Duration::from_secs(60)),
            MockAnswerProvider::ok(Model::ClaudeInstantV1, "B"),
        );
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            canceller.cancel();
        });

        let err = fan_out
            .ask(&Prompt::advisory("q"), &NoProgress, &token)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
    }
}
