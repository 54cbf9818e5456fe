use std::fmt;

use crate::model::{AnswerRecord, QuizDefinition};

//
// ─── PHASE ─────────────────────────────────────────────────────────────────────
//

/// Coarse lifecycle of a session.
///
/// Transitions only move forward (`NotStarted → InProgress → Finished`);
/// leaving `Finished` requires a fresh `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionPhase {
    #[default]
    NotStarted,
    InProgress,
    Finished,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::NotStarted => "not started",
            SessionPhase::InProgress => "in progress",
            SessionPhase::Finished => "finished",
        };
        f.write_str(label)
    }
}

/// Why a session entered `Finished`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinishReason {
    /// The last question was answered.
    AllAnswered,
    /// Wrong answers reached the definition's mistake limit.
    MistakeLimit,
    /// The countdown reached zero.
    TimeExpired,
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FinishReason::AllAnswered => "all questions answered",
            FinishReason::MistakeLimit => "mistake limit reached",
            FinishReason::TimeExpired => "time expired",
        };
        f.write_str(label)
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Mutable record of one quiz session.
///
/// Only `SessionController` writes these fields; everyone else sees clones
/// handed out by `SessionController::snapshot`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub(crate) phase: SessionPhase,
    pub(crate) current_question_index: usize,
    pub(crate) score: f64,
    pub(crate) mistake_count: u32,
    pub(crate) time_remaining_seconds: u32,
    pub(crate) answers: Vec<AnswerRecord>,
    pub(crate) finish_reason: Option<FinishReason>,
}

impl SessionState {
    pub(crate) fn fresh(definition: &QuizDefinition) -> Self {
        Self {
            phase: SessionPhase::InProgress,
            current_question_index: 0,
            score: 0.0,
            mistake_count: 0,
            time_remaining_seconds: definition.duration_seconds,
            answers: Vec::with_capacity(definition.questions.len()),
            finish_reason: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn current_question_index(&self) -> usize {
        self.current_question_index
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn mistake_count(&self) -> u32 {
        self.mistake_count
    }

    #[must_use]
    pub fn time_remaining_seconds(&self) -> u32 {
        self.time_remaining_seconds
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn finish_reason(&self) -> Option<FinishReason> {
        self.finish_reason
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.phase == SessionPhase::InProgress
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == SessionPhase::Finished
    }

    /// Number of answers recorded as correct.
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|answer| answer.is_correct).count()
    }
}
