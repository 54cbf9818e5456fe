use quiz_core::model::{OptionId, QuizDefinition};
use quiz_core::session::SessionState;
use services::SessionProgress;

use crate::vm::time_fmt::{format_countdown, format_marks};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    /// 1-based number the learner types to choose this option.
    pub number: usize,
    pub id: OptionId,
    pub label: String,
}

/// Screen for the question currently being asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionScreenVm {
    pub topic: String,
    pub timer_label: String,
    pub score_label: String,
    pub position_label: String,
    pub progress_percent: u8,
    pub prompt: String,
    pub options: Vec<OptionVm>,
}

impl QuestionScreenVm {
    /// Returns `None` unless the session is in progress.
    #[must_use]
    pub fn from_snapshot(definition: &QuizDefinition, state: &SessionState) -> Option<Self> {
        if !state.is_in_progress() {
            return None;
        }
        let question = definition.question(state.current_question_index())?;
        let progress = SessionProgress::from_state(definition, state);

        let options = question
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| OptionVm {
                number: index + 1,
                id: option.id,
                label: option.description.clone(),
            })
            .collect();

        Some(Self {
            topic: definition.topic.clone(),
            timer_label: format_countdown(state.time_remaining_seconds()),
            score_label: format!("Score: {}", format_marks(state.score())),
            position_label: format!("Question {}/{}", progress.position, progress.total),
            progress_percent: progress.percent(),
            prompt: question.description.clone(),
            options,
        })
    }

    /// Maps a typed option number to its id.
    #[must_use]
    pub fn option_for_number(&self, number: usize) -> Option<OptionId> {
        self.options
            .iter()
            .find(|option| option.number == number)
            .map(|option| option.id)
    }
}
