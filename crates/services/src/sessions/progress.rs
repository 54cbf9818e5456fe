use quiz_core::model::QuizDefinition;
use quiz_core::session::SessionState;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    /// 1-based position of the question on screen.
    pub position: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    #[must_use]
    pub fn from_state(definition: &QuizDefinition, state: &SessionState) -> Self {
        let total = definition.question_count();
        let answered = state.answers().len();
        Self {
            total,
            answered,
            remaining: total.saturating_sub(answered),
            position: (state.current_question_index() + 1).min(total),
            is_complete: state.is_finished(),
        }
    }

    /// Share of the quiz reached so far, counting the question on screen.
    #[must_use]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        let percent = self.position * 100 / self.total;
        u8::try_from(percent.min(100)).unwrap_or(100)
    }
}
