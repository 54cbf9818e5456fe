use serde::Deserialize;

use quiz_core::model::{AnswerOption, OptionId, Question, QuestionId, QuizDefinition};

use crate::error::FetchError;

/// Quiz document as published by the quiz API.
///
/// Marks arrive either as JSON numbers or as numeric strings (`"4.0"`), and
/// `duration` is expressed in minutes.
#[derive(Debug, Clone, Deserialize)]
pub struct QuizPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    pub duration: u32,
    pub correct_answer_marks: Marks,
    pub negative_marks: Marks,
    pub max_mistake_count: u32,
    #[serde(default)]
    pub show_answers: bool,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub questions_count: Option<u32>,
    #[serde(default)]
    pub questions: Vec<QuestionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionPayload {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub detailed_solution: Option<String>,
    #[serde(default)]
    pub options: Vec<OptionPayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OptionPayload {
    pub id: u64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Marks {
    Number(f64),
    Text(String),
}

impl Marks {
    fn parse(&self, field: &'static str) -> Result<f64, FetchError> {
        match self {
            Marks::Number(value) => Ok(*value),
            Marks::Text(raw) => raw.trim().parse().map_err(|_| FetchError::InvalidMarks {
                field,
                raw: raw.clone(),
            }),
        }
    }
}

/// Parse a response body, unwrapping a CORS-proxy `{"contents": "..."}`
/// envelope when present.
///
/// # Errors
///
/// Returns `FetchError::Decode` if the body (or the wrapped contents) is not a
/// quiz document.
pub fn parse_payload(body: &str) -> Result<QuizPayload, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if let Some(contents) = value.get("contents").and_then(serde_json::Value::as_str) {
        return Ok(serde_json::from_str(contents)?);
    }
    Ok(serde_json::from_value(value)?)
}

impl QuizPayload {
    /// Convert the wire document into a domain definition.
    ///
    /// The result is not validated here; callers run `QuizDefinition::validate`.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::InvalidMarks` for unparseable marks and
    /// `FetchError::DurationOverflow` if the duration cannot be expressed in seconds.
    pub fn into_definition(self) -> Result<QuizDefinition, FetchError> {
        let duration_seconds = self
            .duration
            .checked_mul(60)
            .ok_or(FetchError::DurationOverflow {
                minutes: self.duration,
            })?;
        let correct_marks = self.correct_answer_marks.parse("correct_answer_marks")?;
        let negative_marks = self.negative_marks.parse("negative_marks")?;

        let questions = self
            .questions
            .into_iter()
            .map(|question| {
                let options = question
                    .options
                    .into_iter()
                    .map(|option| {
                        AnswerOption::new(
                            OptionId::new(option.id),
                            clean_text(option.description),
                            option.is_correct,
                        )
                    })
                    .collect();
                Question::new(
                    QuestionId::new(question.id),
                    clean_text(question.description),
                    options,
                )
                .with_solution(question.detailed_solution.unwrap_or_default())
            })
            .collect();

        Ok(QuizDefinition {
            title: clean_text(self.title),
            topic: clean_text(self.topic),
            duration_seconds,
            correct_marks,
            negative_marks,
            max_mistake_count: self.max_mistake_count,
            show_answers: self.show_answers,
            questions,
        })
    }
}

fn clean_text(value: Option<String>) -> String {
    value.map(|text| text.trim().to_string()).unwrap_or_default()
}
