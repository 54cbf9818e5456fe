use quiz_core::model::QuizDefinition;

use crate::vm::time_fmt::format_marks;

/// Start screen shown before a session begins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntroVm {
    pub title: String,
    pub correct_label: String,
    pub wrong_label: String,
    pub time_limit_label: String,
    pub questions_label: String,
    pub mistakes_label: String,
}

impl IntroVm {
    #[must_use]
    pub fn from_definition(definition: &QuizDefinition) -> Self {
        let minutes = definition.duration_seconds / 60;
        let seconds = definition.duration_seconds % 60;
        let time_limit_label = if seconds == 0 {
            format!("Time Limit: {minutes} minutes")
        } else {
            format!("Time Limit: {minutes} minutes {seconds} seconds")
        };

        Self {
            title: definition.title.clone(),
            correct_label: format!(
                "Correct Answer: +{} points",
                format_marks(definition.correct_marks)
            ),
            wrong_label: format!(
                "Wrong Answer: -{} points",
                format_marks(definition.negative_marks)
            ),
            time_limit_label,
            questions_label: format!("Questions: {}", definition.question_count()),
            mistakes_label: format!("Allowed Mistakes: {}", definition.max_mistake_count),
        }
    }

    /// Info lines in display order.
    #[must_use]
    pub fn info_lines(&self) -> [&str; 5] {
        [
            &self.correct_label,
            &self.wrong_label,
            &self.time_limit_label,
            &self.questions_label,
            &self.mistakes_label,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerOption, OptionId, Question, QuestionId};

    #[test]
    fn intro_lists_rules() {
        let definition = QuizDefinition::new(
            "Genetics",
            "Inheritance",
            vec![Question::new(
                QuestionId::new(1),
                "Q",
                vec![AnswerOption::new(OptionId::new(1), "a", true)],
            )],
        )
        .with_marks(4.0, 1.0)
        .with_duration_seconds(900)
        .with_max_mistake_count(15);

        let vm = IntroVm::from_definition(&definition);
        assert_eq!(vm.title, "Genetics");
        assert_eq!(
            vm.info_lines(),
            [
                "Correct Answer: +4 points",
                "Wrong Answer: -1 points",
                "Time Limit: 15 minutes",
                "Questions: 1",
                "Allowed Mistakes: 15",
            ]
        );
    }

    #[test]
    fn odd_durations_show_seconds() {
        let definition = QuizDefinition::new("t", "t", Vec::new()).with_duration_seconds(90);
        let vm = IntroVm::from_definition(&definition);
        assert_eq!(vm.time_limit_label, "Time Limit: 1 minutes 30 seconds");
    }
}
