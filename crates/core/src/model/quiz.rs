use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Reasons a quiz definition cannot be played.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizDefinitionError {
    #[error("quiz must contain at least one question")]
    NoQuestions,

    #[error("duration must be > 0 seconds")]
    InvalidDuration,

    #[error("max mistake count must be > 0")]
    InvalidMistakeLimit,

    #[error("{field} must be finite and >= 0")]
    InvalidMarks { field: &'static str },

    #[error("question {question_id} has no options")]
    EmptyOptions { question_id: QuestionId },

    #[error("duplicate question id {0}")]
    DuplicateQuestionId(QuestionId),

    #[error("duplicate option id {option_id} in question {question_id}")]
    DuplicateOptionId {
        question_id: QuestionId,
        option_id: OptionId,
    },
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub description: String,
    pub is_correct: bool,
}

impl AnswerOption {
    #[must_use]
    pub fn new(id: OptionId, description: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            description: description.into(),
            is_correct,
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question.
///
/// Exactly one option is expected to be correct. This is not enforced; scoring
/// simply trusts the `is_correct` flag of whichever option is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub description: String,
    pub options: Vec<AnswerOption>,
    pub detailed_solution: String,
}

impl Question {
    #[must_use]
    pub fn new(
        id: QuestionId,
        description: impl Into<String>,
        options: Vec<AnswerOption>,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            options,
            detailed_solution: String::new(),
        }
    }

    #[must_use]
    pub fn with_solution(mut self, solution: impl Into<String>) -> Self {
        self.detailed_solution = solution.into();
        self
    }

    /// Looks up an option of this question by id.
    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// First option flagged as correct, if any.
    #[must_use]
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.is_correct)
    }
}

//
// ─── DEFINITION ────────────────────────────────────────────────────────────────
//

/// A fully parsed quiz, handed over once by the fetch collaborator.
///
/// The definition is never mutated by a session. Share it behind an `Arc` to
/// reuse it across restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDefinition {
    pub title: String,
    pub topic: String,
    pub duration_seconds: u32,
    pub correct_marks: f64,
    pub negative_marks: f64,
    pub max_mistake_count: u32,
    pub show_answers: bool,
    pub questions: Vec<Question>,
}

impl QuizDefinition {
    /// Creates a definition with a ten minute budget, `+1 / -0` marking and a
    /// mistake limit equal to the number of questions.
    #[must_use]
    pub fn new(title: impl Into<String>, topic: impl Into<String>, questions: Vec<Question>) -> Self {
        let max_mistake_count = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        Self {
            title: title.into(),
            topic: topic.into(),
            duration_seconds: 600,
            correct_marks: 1.0,
            negative_marks: 0.0,
            max_mistake_count,
            show_answers: false,
            questions,
        }
    }

    #[must_use]
    pub fn with_duration_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_marks(mut self, correct: f64, negative: f64) -> Self {
        self.correct_marks = correct;
        self.negative_marks = negative;
        self
    }

    #[must_use]
    pub fn with_max_mistake_count(mut self, count: u32) -> Self {
        self.max_mistake_count = count;
        self
    }

    #[must_use]
    pub fn with_show_answers(mut self, show: bool) -> Self {
        self.show_answers = show;
        self
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    /// Checks that a session can be played against this definition.
    ///
    /// # Errors
    ///
    /// Returns the first `QuizDefinitionError` found, checking question count,
    /// duration, mistake limit, marks, then per-question options and ids.
    pub fn validate(&self) -> Result<(), QuizDefinitionError> {
        if self.questions.is_empty() {
            return Err(QuizDefinitionError::NoQuestions);
        }
        if self.duration_seconds == 0 {
            return Err(QuizDefinitionError::InvalidDuration);
        }
        if self.max_mistake_count == 0 {
            return Err(QuizDefinitionError::InvalidMistakeLimit);
        }
        validate_marks("correct_marks", self.correct_marks)?;
        validate_marks("negative_marks", self.negative_marks)?;

        let mut question_ids = HashSet::with_capacity(self.questions.len());
        for question in &self.questions {
            if !question_ids.insert(question.id) {
                return Err(QuizDefinitionError::DuplicateQuestionId(question.id));
            }
            if question.options.is_empty() {
                return Err(QuizDefinitionError::EmptyOptions {
                    question_id: question.id,
                });
            }
            let mut option_ids = HashSet::with_capacity(question.options.len());
            for option in &question.options {
                if !option_ids.insert(option.id) {
                    return Err(QuizDefinitionError::DuplicateOptionId {
                        question_id: question.id,
                        option_id: option.id,
                    });
                }
            }
        }

        Ok(())
    }
}

fn validate_marks(field: &'static str, value: f64) -> Result<(), QuizDefinitionError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(QuizDefinitionError::InvalidMarks { field })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
