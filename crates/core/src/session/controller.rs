use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::{AnswerRecord, OptionId, QuizDefinition, QuizDefinitionError};
use crate::session::state::{FinishReason, SessionPhase, SessionState};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Controller operation, used to report which call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Start,
    Restart,
    SubmitAnswer,
    Tick,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::Start => "start",
            Operation::Restart => "restart",
            Operation::SubmitAnswer => "submit_answer",
            Operation::Tick => "tick",
        };
        f.write_str(label)
    }
}

/// Errors returned by `SessionController` operations.
///
/// None of these mutate session state. End-of-session conditions (time
/// expiry, mistake limit, last answer) are phase transitions, never errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz definition rejected: {0}")]
    Configuration(#[from] QuizDefinitionError),

    #[error("{operation} is not allowed while the session is {phase}")]
    InvalidState {
        operation: Operation,
        phase: SessionPhase,
    },

    #[error("option {option_id} does not belong to the current question")]
    InvalidInput { option_id: OptionId },
}

impl SessionError {
    /// `false` only for configuration problems the caller has to fix upstream.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SessionError::Configuration(_))
    }
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Sole owner and mutator of a quiz session's state.
///
/// Every operation is synchronous and runs to completion, so the answer path
/// and the clock path can only interleave between calls. `Finished` is sticky:
/// once entered, `submit_answer` and `tick` are rejected until the next
/// `start`/`restart`.
#[derive(Debug, Default)]
pub struct SessionController {
    definition: Option<Arc<QuizDefinition>>,
    state: SessionState,
}

impl SessionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition of the current (or most recent) session.
    #[must_use]
    pub fn definition(&self) -> Option<&Arc<QuizDefinition>> {
        self.definition.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    /// Borrowed view of the live state.
    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Read-only copy of the live state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    /// Begin a fresh session, discarding whatever the previous one recorded.
    ///
    /// Allowed from every phase.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Configuration` if the definition fails
    /// validation; the current state is left untouched in that case.
    pub fn start(&mut self, definition: Arc<QuizDefinition>) -> Result<SessionState, SessionError> {
        if let Err(err) = definition.validate() {
            warn!(error = %err, "rejected quiz definition");
            return Err(SessionError::Configuration(err));
        }

        self.state = SessionState::fresh(&definition);
        debug!(
            title = %definition.title,
            questions = definition.questions.len(),
            duration_seconds = definition.duration_seconds,
            "session started"
        );
        self.definition = Some(definition);
        Ok(self.snapshot())
    }

    /// Start again with the definition of the previous session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if no session was ever started.
    pub fn restart(&mut self) -> Result<SessionState, SessionError> {
        let definition = self
            .definition
            .clone()
            .ok_or_else(|| self.rejected(Operation::Restart))?;
        self.start(definition)
    }

    /// Answer the current question with the given option.
    ///
    /// The score is floored at zero after every update, so losses never carry
    /// below zero. A wrong answer that reaches the mistake limit is recorded
    /// and finishes the session without advancing the question index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    /// Returns `SessionError::InvalidInput` if the option does not belong to
    /// the current question.
    pub fn submit_answer(&mut self, option_id: OptionId) -> Result<SessionState, SessionError> {
        let definition = self.active_definition(Operation::SubmitAnswer)?;
        let index = self.state.current_question_index;
        let question = definition
            .question(index)
            .ok_or_else(|| self.rejected(Operation::SubmitAnswer))?;

        let Some(option) = question.option(option_id) else {
            warn!(%option_id, question_index = index, "unknown option submitted");
            return Err(SessionError::InvalidInput { option_id });
        };

        let record = AnswerRecord::new(index, option.clone());
        let is_correct = record.is_correct;
        let delta = if is_correct {
            definition.correct_marks
        } else {
            -definition.negative_marks
        };
        self.state.score = (self.state.score + delta).max(0.0);
        debug!(
            question_index = index,
            is_correct,
            score = self.state.score,
            "answer recorded"
        );

        if !is_correct {
            self.state.mistake_count += 1;
            if self.state.mistake_count >= definition.max_mistake_count {
                self.state.answers.push(record);
                self.finish(FinishReason::MistakeLimit);
                return Ok(self.snapshot());
            }
        }

        self.state.answers.push(record);
        if index + 1 >= definition.questions.len() {
            self.finish(FinishReason::AllAnswered);
        } else {
            self.state.current_question_index += 1;
        }

        Ok(self.snapshot())
    }

    /// Deduct elapsed time from the countdown.
    ///
    /// Reaching zero finishes the session; the current question, if any, is
    /// left unrecorded. A zero `elapsed_seconds` changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is in progress.
    pub fn tick(&mut self, elapsed_seconds: u32) -> Result<SessionState, SessionError> {
        self.ensure_in_progress(Operation::Tick)?;
        if elapsed_seconds == 0 {
            return Ok(self.snapshot());
        }

        self.state.time_remaining_seconds = self
            .state
            .time_remaining_seconds
            .saturating_sub(elapsed_seconds);
        if self.state.time_remaining_seconds == 0 {
            self.finish(FinishReason::TimeExpired);
        }

        Ok(self.snapshot())
    }

    fn active_definition(&self, operation: Operation) -> Result<Arc<QuizDefinition>, SessionError> {
        self.ensure_in_progress(operation)?;
        self.definition
            .clone()
            .ok_or_else(|| self.rejected(operation))
    }

    fn ensure_in_progress(&self, operation: Operation) -> Result<(), SessionError> {
        if self.state.phase == SessionPhase::InProgress {
            Ok(())
        } else {
            Err(self.rejected(operation))
        }
    }

    fn rejected(&self, operation: Operation) -> SessionError {
        debug!(%operation, phase = %self.state.phase, "operation rejected");
        SessionError::InvalidState {
            operation,
            phase: self.state.phase,
        }
    }

    fn finish(&mut self, reason: FinishReason) {
        self.state.phase = SessionPhase::Finished;
        self.state.finish_reason = Some(reason);
        info!(
            %reason,
            score = self.state.score,
            answered = self.state.answers.len(),
            mistakes = self.state.mistake_count,
            "session finished"
        );
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerOption, Question, QuestionId};

    const RIGHT: u64 = 0;
    const WRONG: u64 = 1;

    /// Question `n` has option `n*10` correct and `n*10 + 1` wrong.
    fn quiz(questions: u64) -> QuizDefinition {
        let questions = (1..=questions)
            .map(|n| {
                Question::new(
                    QuestionId::new(n),
                    format!("Q{n}"),
                    vec![
                        AnswerOption::new(OptionId::new(n * 10 + RIGHT), "right", true),
                        AnswerOption::new(OptionId::new(n * 10 + WRONG), "wrong", false),
                    ],
                )
            })
            .collect();
        QuizDefinition::new("Quiz", "Topic", questions)
    }

    fn right(controller: &SessionController) -> OptionId {
        option_for(controller, RIGHT)
    }

    fn wrong(controller: &SessionController) -> OptionId {
        option_for(controller, WRONG)
    }

    fn option_for(controller: &SessionController, offset: u64) -> OptionId {
        let definition = controller.definition().unwrap();
        let question = &definition.questions[controller.state().current_question_index()];
        OptionId::new(question.id.value() * 10 + offset)
    }

    fn started(definition: QuizDefinition) -> SessionController {
        let mut controller = SessionController::new();
        controller.start(Arc::new(definition)).unwrap();
        controller
    }

    #[test]
    fn new_controller_is_not_started() {
        let controller = SessionController::new();
        assert_eq!(controller.phase(), SessionPhase::NotStarted);
        assert!(controller.definition().is_none());
    }

    #[test]
    fn start_initializes_every_field() {
        let controller = started(quiz(3).with_duration_seconds(60));
        let state = controller.snapshot();
        assert_eq!(state.phase(), SessionPhase::InProgress);
        assert_eq!(state.current_question_index(), 0);
        assert_eq!(state.score(), 0.0);
        assert_eq!(state.mistake_count(), 0);
        assert_eq!(state.time_remaining_seconds(), 60);
        assert!(state.answers().is_empty());
        assert_eq!(state.finish_reason(), None);
    }

    #[test]
    fn start_rejects_invalid_definition_without_touching_state() {
        let mut controller = started(quiz(2));
        controller.submit_answer(right(&controller)).unwrap();
        let before = controller.snapshot();

        let err = controller
            .start(Arc::new(quiz(0).with_max_mistake_count(1)))
            .unwrap_err();
        assert_eq!(
            err,
            SessionError::Configuration(QuizDefinitionError::NoQuestions)
        );
        assert!(!err.is_recoverable());
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn all_correct_scores_every_question() {
        let mut controller = started(
            quiz(3)
                .with_marks(4.0, 1.0)
                .with_max_mistake_count(3)
                .with_duration_seconds(60),
        );
        for _ in 0..3 {
            controller.submit_answer(right(&controller)).unwrap();
        }
        let state = controller.snapshot();
        assert_eq!(state.score(), 12.0);
        assert_eq!(state.phase(), SessionPhase::Finished);
        assert_eq!(state.answers().len(), 3);
        assert_eq!(state.finish_reason(), Some(FinishReason::AllAnswered));
        assert_eq!(state.current_question_index(), 2);
    }

    #[test]
    fn score_is_floored_after_every_update() {
        let mut controller = started(quiz(3).with_marks(1.0, 5.0));
        let state = controller.submit_answer(wrong(&controller)).unwrap();
        assert_eq!(state.score(), 0.0);

        let state = controller.submit_answer(right(&controller)).unwrap();
        assert_eq!(state.score(), 1.0);
    }

    #[test]
    fn mistake_limit_finishes_without_advancing() {
        let mut controller = started(quiz(5).with_max_mistake_count(2));
        controller.submit_answer(wrong(&controller)).unwrap();
        let state = controller.submit_answer(wrong(&controller)).unwrap();

        assert_eq!(state.phase(), SessionPhase::Finished);
        assert_eq!(state.answers().len(), 2);
        assert_eq!(state.current_question_index(), 1);
        assert_eq!(state.mistake_count(), 2);
        assert_eq!(state.finish_reason(), Some(FinishReason::MistakeLimit));
        assert_eq!(state.answers()[1].question_index, 1);
    }

    #[test]
    fn mistake_limit_on_last_question_wins_over_exhaustion() {
        let mut controller = started(quiz(1).with_max_mistake_count(1));
        let state = controller.submit_answer(wrong(&controller)).unwrap();
        assert_eq!(state.finish_reason(), Some(FinishReason::MistakeLimit));
        assert_eq!(state.answers().len(), 1);
    }

    #[test]
    fn unknown_option_is_rejected_without_change() {
        let mut controller = started(quiz(2));
        let before = controller.snapshot();
        let err = controller.submit_answer(OptionId::new(999)).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidInput {
                option_id: OptionId::new(999)
            }
        );
        assert!(err.is_recoverable());
        assert_eq!(controller.snapshot(), before);
    }

    #[test]
    fn option_of_another_question_is_rejected() {
        let mut controller = started(quiz(2));
        let err = controller.submit_answer(OptionId::new(20)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidInput { .. }));
    }

    #[test]
    fn tick_expiry_finishes_without_recording() {
        let mut controller = started(quiz(3).with_duration_seconds(5));
        let state = controller.tick(5).unwrap();
        assert_eq!(state.phase(), SessionPhase::Finished);
        assert_eq!(state.time_remaining_seconds(), 0);
        assert!(state.answers().is_empty());
        assert_eq!(state.finish_reason(), Some(FinishReason::TimeExpired));
    }

    #[test]
    fn tick_saturates_at_zero_and_zero_tick_is_noop() {
        let mut controller = started(quiz(1).with_duration_seconds(3));
        let state = controller.tick(0).unwrap();
        assert_eq!(state.time_remaining_seconds(), 3);
        let state = controller.tick(2).unwrap();
        assert_eq!(state.time_remaining_seconds(), 1);
        assert!(state.is_in_progress());
        let state = controller.tick(10).unwrap();
        assert_eq!(state.time_remaining_seconds(), 0);
        assert!(state.is_finished());
    }

    #[test]
    fn answer_after_expiry_is_rejected() {
        let mut controller = started(quiz(3).with_duration_seconds(5));
        controller.tick(5).unwrap();
        let option = OptionId::new(10);
        let err = controller.submit_answer(option).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidState {
                operation: Operation::SubmitAnswer,
                phase: SessionPhase::Finished,
            }
        );
        assert!(controller.state().answers().is_empty());
    }

    #[test]
    fn tick_after_finish_does_not_deduct_time() {
        let mut controller = started(quiz(1).with_duration_seconds(30));
        controller.submit_answer(right(&controller)).unwrap();
        let before = controller.snapshot();
        let err = controller.tick(1).unwrap_err();
        assert!(matches!(err, SessionError::InvalidState { .. }));
        assert_eq!(controller.snapshot(), before);
        assert_eq!(before.time_remaining_seconds(), 30);
    }

    #[test]
    fn operations_before_start_are_rejected() {
        let mut controller = SessionController::new();
        assert!(matches!(
            controller.tick(1),
            Err(SessionError::InvalidState {
                operation: Operation::Tick,
                phase: SessionPhase::NotStarted
            })
        ));
        assert!(matches!(
            controller.submit_answer(OptionId::new(1)),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            controller.restart(),
            Err(SessionError::InvalidState {
                operation: Operation::Restart,
                ..
            })
        ));
    }

    #[test]
    fn start_twice_fully_resets() {
        let definition = Arc::new(quiz(3).with_marks(4.0, 1.0).with_duration_seconds(60));
        let mut controller = SessionController::new();
        controller.start(Arc::clone(&definition)).unwrap();
        controller.submit_answer(right(&controller)).unwrap();
        controller.submit_answer(wrong(&controller)).unwrap();
        controller.tick(7).unwrap();

        let state = controller.start(Arc::clone(&definition)).unwrap();
        assert_eq!(state, SessionState::fresh(&definition));
        assert!(Arc::ptr_eq(controller.definition().unwrap(), &definition));
    }

    #[test]
    fn restart_from_finished_reuses_definition() {
        let mut controller = started(quiz(1).with_duration_seconds(2));
        controller.tick(2).unwrap();
        let state = controller.restart().unwrap();
        assert_eq!(state.phase(), SessionPhase::InProgress);
        assert_eq!(state.time_remaining_seconds(), 2);
    }

    #[derive(Clone, Copy, Debug)]
    enum Step {
        Right,
        Wrong,
        Bogus,
        Tick(u32),
    }

    fn apply(controller: &mut SessionController, step: Step) {
        let _ = match step {
            Step::Right if controller.state().is_in_progress() => {
                controller.submit_answer(right(controller))
            }
            Step::Wrong if controller.state().is_in_progress() => {
                controller.submit_answer(wrong(controller))
            }
            Step::Right | Step::Wrong => controller.submit_answer(OptionId::new(10)),
            Step::Bogus => controller.submit_answer(OptionId::new(12345)),
            Step::Tick(seconds) => controller.tick(seconds),
        };
    }

    fn check_invariants(definition: &QuizDefinition, before: &SessionState, after: &SessionState) {
        assert!(after.score() >= 0.0);
        let wrong = after.answers().iter().filter(|a| !a.is_correct).count();
        assert_eq!(after.mistake_count() as usize, wrong);
        assert!(after.answers().len() <= definition.questions.len());
        if after.is_in_progress() {
            assert_eq!(after.answers().len(), after.current_question_index());
        }
        if before.is_finished() {
            assert_eq!(before, after);
        }
        assert_eq!(after.is_finished(), after.finish_reason().is_some());
    }

    #[test]
    fn invariants_hold_for_every_short_call_sequence() {
        const STEPS: [Step; 5] = [
            Step::Right,
            Step::Wrong,
            Step::Bogus,
            Step::Tick(1),
            Step::Tick(3),
        ];
        const DEPTH: u32 = 6;

        let definition = Arc::new(
            quiz(4)
                .with_marks(1.0, 2.5)
                .with_max_mistake_count(3)
                .with_duration_seconds(5),
        );

        for mut code in 0..STEPS.len().pow(DEPTH) {
            let mut controller = SessionController::new();
            controller.start(Arc::clone(&definition)).unwrap();
            for _ in 0..DEPTH {
                let step = STEPS[code % STEPS.len()];
                code /= STEPS.len();
                let before = controller.snapshot();
                apply(&mut controller, step);
                check_invariants(&definition, &before, controller.state());
            }
        }
    }
}
