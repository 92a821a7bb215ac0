//! Quiz entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::Aggregate;
use crate::error::DomainError;

/// Minimum number of incorrect answers a multiple-choice question needs to be
/// playable. It is also the number of decoys shown next to the correct answer.
pub const INCORRECT_ANSWER_COUNT: usize = 3;

/// How a quiz's questions are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuizType {
    /// Players type the answer as free text.
    SingleAnswer,
    /// Players pick the answer among shuffled choices.
    MultipleChoice,
}

impl QuizType {
    /// Wire name of the quiz type.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SingleAnswer => "single-answer",
            Self::MultipleChoice => "multiple-choice",
        }
    }
}

impl fmt::Display for QuizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuizType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "single-answer" => Ok(Self::SingleAnswer),
            "multiple-choice" => Ok(Self::MultipleChoice),
            other => Err(DomainError::validation(
                "type",
                format!("unknown quiz type `{other}`"),
            )),
        }
    }
}

/// A single question inside a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Globally unique question identifier.
    pub id: Uuid,
    /// The question as shown to players.
    pub text: String,
    /// The one correct answer.
    pub correct_answer: String,
    /// Decoys for multiple-choice play, in authoring order.
    pub incorrect_answers: Vec<String>,
}

impl Question {
    /// Whether this question can be played in a quiz of the given type.
    ///
    /// A quiz without a type has no playable questions.
    #[must_use]
    pub fn is_valid_for(&self, quiz_type: Option<QuizType>) -> bool {
        match quiz_type {
            Some(QuizType::SingleAnswer) => true,
            Some(QuizType::MultipleChoice) => {
                self.incorrect_answers.len() >= INCORRECT_ANSWER_COUNT
            }
            None => false,
        }
    }
}

/// A quiz: a named, typed, ordered list of questions.
///
/// An empty name or an unset type is the normal state of a draft in progress,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    /// Quiz identifier, assigned once at creation.
    pub id: Uuid,
    /// Display name; empty while drafting.
    pub name: String,
    /// Answering mode; unset while drafting.
    #[serde(rename = "type")]
    pub quiz_type: Option<QuizType>,
    /// Questions in authoring order, valid or not.
    pub questions: Vec<Question>,
    /// Time of the last applied edit.
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    /// Creates an empty draft.
    #[must_use]
    pub fn new(id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: String::new(),
            quiz_type: None,
            questions: Vec::new(),
            updated_at: now,
        }
    }

    /// Questions playable under the quiz's current type, in authoring order.
    pub fn valid_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions
            .iter()
            .filter(|question| question.is_valid_for(self.quiz_type))
    }

    /// Number of playable questions.
    #[must_use]
    pub fn valid_question_count(&self) -> usize {
        self.valid_questions().count()
    }
}

impl Aggregate for Quiz {
    const KIND: &'static str = "quiz";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(incorrect: usize) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: "Capital of Peru?".to_owned(),
            correct_answer: "Lima".to_owned(),
            incorrect_answers: (0..incorrect).map(|i| format!("wrong {i}")).collect(),
        }
    }

    fn quiz_with(quiz_type: Option<QuizType>, questions: Vec<Question>) -> Quiz {
        let mut quiz = Quiz::new(Uuid::new_v4(), Utc::now());
        quiz.quiz_type = quiz_type;
        quiz.questions = questions;
        quiz
    }

    #[test]
    fn test_single_answer_quiz_counts_every_question() {
        let quiz = quiz_with(
            Some(QuizType::SingleAnswer),
            vec![question(0), question(1), question(5)],
        );
        assert_eq!(quiz.valid_question_count(), 3);
    }

    #[test]
    fn test_multiple_choice_quiz_counts_questions_with_enough_decoys() {
        let quiz = quiz_with(
            Some(QuizType::MultipleChoice),
            vec![question(0), question(2), question(3), question(4)],
        );
        assert_eq!(quiz.valid_question_count(), 2);
        assert!(
            quiz.valid_questions()
                .all(|q| q.incorrect_answers.len() >= INCORRECT_ANSWER_COUNT)
        );
    }

    #[test]
    fn test_untyped_quiz_has_no_valid_questions() {
        let quiz = quiz_with(None, vec![question(3)]);
        assert_eq!(quiz.valid_question_count(), 0);
    }

    #[test]
    fn test_quiz_type_parses_wire_names() {
        assert_eq!(
            "multiple-choice".parse::<QuizType>().unwrap(),
            QuizType::MultipleChoice
        );
        assert_eq!(
            " single-answer ".parse::<QuizType>().unwrap(),
            QuizType::SingleAnswer
        );
        match "essay".parse::<QuizType>().unwrap_err() {
            DomainError::Validation { field, .. } => assert_eq!(field, "type"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_quiz_serializes_type_under_wire_name() {
        let quiz = quiz_with(Some(QuizType::MultipleChoice), Vec::new());
        let json = serde_json::to_value(&quiz).unwrap();
        assert_eq!(json["type"], "multiple-choice");
    }
}
