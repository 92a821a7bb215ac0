//! Multiple-choice option generation.

use quizcraft_core::quiz::{INCORRECT_ANSWER_COUNT, Question};
use quizcraft_core::rng::DeterministicRng;
use rand::seq::{IndexedRandom, SliceRandom};

/// Display-ordered options for one multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerChoices {
    /// Options in display order.
    pub choices: Vec<String>,
    /// Position of the correct answer in `choices`.
    pub correct_index: usize,
}

/// Builds a freshly shuffled option list for `question`.
///
/// At most [`INCORRECT_ANSWER_COUNT`] incorrect answers are sampled. The
/// correct answer is tracked by position, so a decoy with the same text cannot
/// be mistaken for it.
pub fn select_answers(question: &Question, rng: &mut dyn DeterministicRng) -> AnswerChoices {
    let mut options: Vec<Option<&str>> = question
        .incorrect_answers
        .choose_multiple(rng, INCORRECT_ANSWER_COUNT)
        .map(|decoy| Some(decoy.as_str()))
        .collect();
    options.push(None);
    options.shuffle(rng);

    let correct_index = options.iter().position(Option::is_none).unwrap_or_default();
    let choices = options
        .into_iter()
        .map(|option| option.unwrap_or(&question.correct_answer).to_owned())
        .collect();

    AnswerChoices {
        choices,
        correct_index,
    }
}
