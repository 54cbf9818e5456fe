mod answer;
mod ids;
mod quiz;

pub use answer::AnswerRecord;
pub use ids::{OptionId, ParseIdError, QuestionId};
pub use quiz::{AnswerOption, Question, QuizDefinition, QuizDefinitionError};
