use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::QuizDefinition;
use crate::session::state::{FinishReason, SessionState};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("session has not finished yet")]
    NotFinished,

    #[error("completed_at is before started_at")]
    InvalidTimeRange,
}

/// Results of a finished quiz session.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSummary {
    score: f64,
    correct: usize,
    wrong: usize,
    total_questions: usize,
    finish_reason: FinishReason,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
}

impl QuizSummary {
    /// Build the results record for a finished session.
    ///
    /// Unanswered questions (time expiry, mistake limit) count towards
    /// `total_questions` but neither `correct` nor `wrong`.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::NotFinished` unless the session is finished.
    /// Returns `SummaryError::InvalidTimeRange` if `completed_at` is before `started_at`.
    pub fn from_session(
        definition: &QuizDefinition,
        state: &SessionState,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, SummaryError> {
        let finish_reason = state
            .finish_reason()
            .filter(|_| state.is_finished())
            .ok_or(SummaryError::NotFinished)?;
        if completed_at < started_at {
            return Err(SummaryError::InvalidTimeRange);
        }

        let correct = state.correct_count();
        Ok(Self {
            score: state.score(),
            correct,
            wrong: state.answers().len() - correct,
            total_questions: definition.question_count(),
            finish_reason,
            started_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn correct(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn wrong(&self) -> usize {
        self.wrong
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.correct + self.wrong
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.total_questions
    }

    #[must_use]
    pub fn unanswered(&self) -> usize {
        self.total_questions.saturating_sub(self.answered())
    }

    #[must_use]
    pub fn finish_reason(&self) -> FinishReason {
        self.finish_reason
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn elapsed_seconds(&self) -> i64 {
        (self.completed_at - self.started_at).num_seconds()
    }
}
