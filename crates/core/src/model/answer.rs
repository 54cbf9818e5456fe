use crate::model::quiz::AnswerOption;

/// History entry for one answered question.
///
/// Records are append-only. `question_index` is the position in the
/// definition's question list at the time of answering, and `is_correct` is a
/// snapshot of the selected option's flag.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub selected_option: AnswerOption,
    pub is_correct: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn new(question_index: usize, selected_option: AnswerOption) -> Self {
        let is_correct = selected_option.is_correct;
        Self {
            question_index,
            selected_option,
            is_correct,
        }
    }
}
