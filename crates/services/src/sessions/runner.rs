use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::debug;

use quiz_core::model::{OptionId, QuizDefinition};
use quiz_core::session::{QuizSummary, SessionController, SessionError, SessionState};

use crate::Clock;
use crate::error::RunError;

/// Change notifications sent to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    Started(SessionState),
    Ticked(SessionState),
    Answered(SessionState),
    /// The option did not belong to the current question; prompt again.
    Rejected {
        option_id: OptionId,
        state: SessionState,
    },
    Finished(SessionOutcome),
}

/// Final state and results of a played session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub state: SessionState,
    pub summary: QuizSummary,
}

/// Plays one session: owns the controller and acts as its clock.
///
/// Answers and timer ticks are handled on a single task, so each controller
/// operation completes before the next one starts. When both are ready at
/// the same instant the tick is applied first.
#[derive(Debug, Clone)]
pub struct QuizSessionRunner {
    definition: Arc<QuizDefinition>,
    clock: Clock,
    tick_interval: Duration,
}

impl QuizSessionRunner {
    #[must_use]
    pub fn new(definition: Arc<QuizDefinition>, clock: Clock) -> Self {
        Self {
            definition,
            clock,
            tick_interval: Duration::from_secs(1),
        }
    }

    /// Real time between two one-second ticks. Tests and demos shorten it.
    #[must_use]
    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    /// Run until the session finishes.
    ///
    /// Closing the answer channel does not end the session; the countdown
    /// keeps running until time expires. A dropped `updates` receiver is
    /// tolerated.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Session` if the definition is rejected by the
    /// controller, and `RunError::Summary` if the results cannot be built.
    pub async fn run(
        self,
        mut answers: mpsc::Receiver<OptionId>,
        updates: mpsc::Sender<SessionUpdate>,
    ) -> Result<SessionOutcome, RunError> {
        let mut clock = self.clock;
        let mut controller = SessionController::new();
        let state = controller.start(Arc::clone(&self.definition))?;
        let started_at = clock.now();
        notify(&updates, SessionUpdate::Started(state)).await;

        let mut ticker = interval_at(Instant::now() + self.tick_interval, self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut answers_open = true;

        while controller.state().is_in_progress() {
            tokio::select! {
                biased;

                _ = ticker.tick() => {
                    clock.advance(chrono::Duration::seconds(1));
                    let state = controller.tick(1)?;
                    notify(&updates, SessionUpdate::Ticked(state)).await;
                }
                received = answers.recv(), if answers_open => match received {
                    Some(option_id) => match controller.submit_answer(option_id) {
                        Ok(state) => notify(&updates, SessionUpdate::Answered(state)).await,
                        Err(SessionError::InvalidInput { option_id }) => {
                            let state = controller.snapshot();
                            notify(&updates, SessionUpdate::Rejected { option_id, state }).await;
                        }
                        Err(err) => return Err(err.into()),
                    },
                    None => {
                        debug!("answer channel closed, waiting for the countdown");
                        answers_open = false;
                    }
                },
            }
        }

        let state = controller.snapshot();
        let summary = QuizSummary::from_session(&self.definition, &state, started_at, clock.now())?;
        let outcome = SessionOutcome { state, summary };
        notify(&updates, SessionUpdate::Finished(outcome.clone())).await;
        Ok(outcome)
    }
}

async fn notify(updates: &mpsc::Sender<SessionUpdate>, update: SessionUpdate) {
    if updates.send(update).await.is_err() {
        debug!("session update receiver dropped");
    }
}
