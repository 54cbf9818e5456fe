use quiz_core::model::QuizDefinition;
use quiz_core::session::{FinishReason, QuizSummary, SessionState};

use crate::vm::markdown_vm::solution_plain_text;
use crate::vm::time_fmt::{format_datetime, format_elapsed, format_marks};

/// One answered question on the results screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRowVm {
    pub question: String,
    pub your_answer: String,
    pub is_correct: bool,
    /// Only present for wrong answers when the quiz exposes solutions.
    pub solution: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultsVm {
    pub heading: String,
    pub final_score_label: String,
    pub correct_label: String,
    pub reason_label: String,
    pub elapsed_label: String,
    pub completed_at_str: String,
    pub rows: Vec<AnswerRowVm>,
}

impl ResultsVm {
    #[must_use]
    pub fn from_summary(
        definition: &QuizDefinition,
        state: &SessionState,
        summary: &QuizSummary,
    ) -> Self {
        let rows = state
            .answers()
            .iter()
            .map(|answer| {
                let question = definition.question(answer.question_index);
                let solution = question
                    .filter(|_| definition.show_answers && !answer.is_correct)
                    .map(|question| solution_plain_text(&question.detailed_solution))
                    .filter(|text| !text.is_empty());
                AnswerRowVm {
                    question: question
                        .map(|question| question.description.clone())
                        .unwrap_or_default(),
                    your_answer: answer.selected_option.description.clone(),
                    is_correct: answer.is_correct,
                    solution,
                }
            })
            .collect();

        let reason_label = match summary.finish_reason() {
            FinishReason::AllAnswered => "All questions answered".to_string(),
            FinishReason::MistakeLimit => "Too many mistakes".to_string(),
            FinishReason::TimeExpired => "Time is up".to_string(),
        };

        Self {
            heading: "Quiz Complete!".to_string(),
            final_score_label: format!("Final Score: {}", format_marks(summary.score())),
            correct_label: format!(
                "Correct Answers: {} / {}",
                summary.correct(),
                summary.total_questions()
            ),
            reason_label,
            elapsed_label: format!("Time Taken: {}", format_elapsed(summary.elapsed_seconds())),
            completed_at_str: format_datetime(summary.completed_at()),
            rows,
        }
    }
}
