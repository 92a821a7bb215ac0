//! Aggregate roots for the Game Session context.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use quizcraft_core::aggregate::Aggregate;
use quizcraft_core::error::DomainError;
use quizcraft_core::quiz::{Question, Quiz, QuizType};
use quizcraft_core::rng::DeterministicRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::selector::select_answers;

/// Extra points for the first answer to a question under
/// [`ScoringType::First`], on top of the regular point.
pub const FIRST_ANSWER_BONUS: u32 = 2;

/// Who plays a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    /// One player; every answer advances the question.
    Solo,
    /// Everyone in the channel; only the GM advances.
    Party,
}

impl FromStr for GameType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "solo" => Ok(Self::Solo),
            "party" => Ok(Self::Party),
            other => Err(DomainError::validation(
                "game_type",
                format!("unknown game type `{other}`"),
            )),
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Solo => "solo",
            Self::Party => "party",
        })
    }
}

/// How correct answers are rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringType {
    /// One point per correct answer.
    All,
    /// Like `All`, plus [`FIRST_ANSWER_BONUS`] when the first answer to a
    /// question is correct.
    First,
}

impl FromStr for ScoringType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" => Ok(Self::All),
            "first" => Ok(Self::First),
            other => Err(DomainError::validation(
                "scoring_type",
                format!("unknown scoring type `{other}`"),
            )),
        }
    }
}

/// A player's answer to the current question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerPayload {
    /// Free text, for single-answer quizzes.
    Text(String),
    /// Index into the displayed choices, for multiple-choice quizzes.
    Choice(usize),
}

/// One row of the score table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub username: String,
    pub points: u32,
}

/// Settings chosen when a game is started.
#[derive(Debug, Clone)]
pub struct GameSettings {
    /// User id of the game master.
    pub gm: String,
    pub game_type: GameType,
    pub scoring_type: ScoringType,
    /// Requested number of questions. Zero, negative and too-large requests
    /// all mean "every valid question".
    pub requested_questions: i64,
    /// Post that anchors the session in the channel, if any.
    pub root_post_id: Option<String>,
}

/// How a submitted answer was judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOutcome {
    pub correct: bool,
    pub points_awarded: u32,
}

/// The answer to a question the game has moved past.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSolution {
    pub question_id: Uuid,
    pub text: String,
    pub correct_answer: String,
    /// Usernames that got it right, in answer order.
    pub right_answerers: Vec<String>,
}

/// Where the session stands after an advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// A new current question is in place.
    Next,
    /// The last question was popped; the game must be deleted.
    Completed,
}

/// Clamps a requested question count into `[1, valid]`, treating
/// out-of-range requests as "all valid questions".
#[must_use]
pub fn clamp_question_count(requested: i64, valid: usize) -> usize {
    match usize::try_from(requested) {
        Ok(n) if n > 0 && n <= valid => n,
        _ => valid,
    }
}

/// The aggregate root for a running game.
///
/// `remaining_questions` shrinks from the front; its head is the current
/// question. The game is deleted as soon as it is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub id: Uuid,
    /// Private copy of the quiz taken at start.
    pub quiz: Quiz,
    /// User id of the game master.
    pub gm: String,
    pub game_type: GameType,
    pub scoring_type: ScoringType,
    /// Points per username, in first-answer order.
    pub score: Vec<ScoreEntry>,
    /// Username to user id, for everyone who answered.
    pub players: BTreeMap<String, String>,
    pub remaining_questions: Vec<Question>,
    pub questions_total: usize,
    pub root_post_id: Option<String>,
    pub current_post_id: Option<String>,
    /// Usernames that answered the current question.
    pub already_answered: Vec<String>,
    /// Options for the current question (multiple choice only).
    pub current_choices: Vec<String>,
    pub correct_choice_index: Option<usize>,
    /// Usernames that answered the current question correctly, in order.
    pub right_answerers: Vec<String>,
    /// Solution of the question passed by the latest advance.
    #[serde(default)]
    pub previous_solution: Option<QuestionSolution>,
    pub started_at: DateTime<Utc>,
}

impl Aggregate for Game {
    const KIND: &'static str = "game";

    fn aggregate_id(&self) -> Uuid {
        self.id
    }
}

impl Game {
    /// Starts a session over a snapshot of `quiz`.
    ///
    /// Valid questions are shuffled and the first `n` kept, where `n` is the
    /// clamped request. For multiple-choice quizzes, options for the first
    /// question are generated immediately.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the quiz has no valid question.
    pub fn start(
        id: Uuid,
        quiz: Quiz,
        settings: GameSettings,
        now: DateTime<Utc>,
        rng: &mut dyn DeterministicRng,
    ) -> Result<Self, DomainError> {
        let mut questions: Vec<Question> = quiz.valid_questions().cloned().collect();
        if questions.is_empty() {
            return Err(DomainError::validation(
                "quiz",
                "the quiz has no playable questions",
            ));
        }

        let count = clamp_question_count(settings.requested_questions, questions.len());
        questions.shuffle(rng);
        questions.truncate(count);

        let mut game = Self {
            id,
            quiz,
            gm: settings.gm,
            game_type: settings.game_type,
            scoring_type: settings.scoring_type,
            score: Vec::new(),
            players: BTreeMap::new(),
            remaining_questions: questions,
            questions_total: count,
            root_post_id: settings.root_post_id.clone(),
            current_post_id: settings.root_post_id,
            already_answered: Vec::new(),
            current_choices: Vec::new(),
            correct_choice_index: None,
            right_answerers: Vec::new(),
            previous_solution: None,
            started_at: now,
        };
        game.prepare_current_question(rng);
        Ok(game)
    }

    /// The question currently being asked.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.remaining_questions.first()
    }

    /// 1-based position of the current question.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.questions_total - self.remaining_questions.len() + 1
    }

    /// Rejects references to anything but the current question.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StaleQuestion` if `question_id` is not the head.
    pub fn ensure_current(&self, question_id: Uuid) -> Result<&Question, DomainError> {
        match self.current_question() {
            Some(question) if question.id == question_id => Ok(question),
            Some(question) => Err(DomainError::StaleQuestion {
                expected: question.id,
                received: question_id,
            }),
            None => Err(DomainError::StaleQuestion {
                expected: Uuid::nil(),
                received: question_id,
            }),
        }
    }

    /// Rejects anyone but the game master.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Forbidden` if `user_id` is not the GM.
    pub fn ensure_gm(&self, user_id: &str) -> Result<(), DomainError> {
        if self.gm == user_id {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "only the game master can move to the next question".to_owned(),
            ))
        }
    }

    /// Records `username`'s answer to the current question.
    ///
    /// Nothing is changed when an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StaleQuestion` if `question_id` is not the
    /// current question, `DomainError::DuplicateAnswer` if `username` already
    /// answered it, or `DomainError::Validation` if the payload does not fit
    /// the quiz type.
    pub fn submit_answer(
        &mut self,
        question_id: Uuid,
        username: &str,
        user_id: &str,
        answer: &AnswerPayload,
    ) -> Result<AnswerOutcome, DomainError> {
        let question = self.ensure_current(question_id)?;
        if self.already_answered.iter().any(|name| name == username) {
            return Err(DomainError::DuplicateAnswer {
                username: username.to_owned(),
            });
        }
        let correct = self.judge(question, answer)?;

        self.already_answered.push(username.to_owned());
        self.players
            .insert(username.to_owned(), user_id.to_owned());

        let mut points_awarded = 0;
        if correct {
            points_awarded += 1;
            if self.scoring_type == ScoringType::First && self.already_answered.len() == 1 {
                points_awarded += FIRST_ANSWER_BONUS;
            }
            self.right_answerers.push(username.to_owned());
        }
        self.add_points(username, points_awarded);

        Ok(AnswerOutcome {
            correct,
            points_awarded,
        })
    }

    /// Pops the current question and prepares the next one.
    ///
    /// The popped question's answer and its right answerers are kept in
    /// `previous_solution`.
    pub fn advance(&mut self, rng: &mut dyn DeterministicRng) -> Advance {
        if !self.remaining_questions.is_empty() {
            let passed = self.remaining_questions.remove(0);
            self.previous_solution = Some(QuestionSolution {
                question_id: passed.id,
                text: passed.text,
                correct_answer: passed.correct_answer,
                right_answerers: std::mem::take(&mut self.right_answerers),
            });
        }
        self.already_answered.clear();
        self.right_answerers.clear();
        self.current_choices.clear();
        self.correct_choice_index = None;

        if self.remaining_questions.is_empty() {
            return Advance::Completed;
        }
        self.prepare_current_question(rng);
        Advance::Next
    }

    /// Records the post now displaying the current question.
    pub fn attach_post(&mut self, post_id: String) {
        self.current_post_id = Some(post_id);
    }

    /// Score rows sorted by points, highest first. Ties keep first-answer
    /// order.
    #[must_use]
    pub fn scoreboard(&self) -> Vec<ScoreEntry> {
        let mut rows = self.score.clone();
        rows.sort_by(|a, b| b.points.cmp(&a.points));
        rows
    }

    /// The first player holding the top score, if anyone answered. A table
    /// where everyone has zero points still has a winner.
    #[must_use]
    pub fn winner(&self) -> Option<&ScoreEntry> {
        let top = self.score.iter().map(|row| row.points).max()?;
        self.score.iter().find(|row| row.points == top)
    }

    fn judge(&self, question: &Question, answer: &AnswerPayload) -> Result<bool, DomainError> {
        match (self.quiz.quiz_type, answer) {
            (Some(QuizType::SingleAnswer), AnswerPayload::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(DomainError::validation("answer", "must not be empty"));
                }
                Ok(text == question.correct_answer)
            }
            (Some(QuizType::MultipleChoice), AnswerPayload::Choice(index)) => {
                if *index >= self.current_choices.len() {
                    return Err(DomainError::validation(
                        "answer",
                        format!(
                            "choice {index} is out of range (0..{})",
                            self.current_choices.len()
                        ),
                    ));
                }
                Ok(Some(*index) == self.correct_choice_index)
            }
            (Some(QuizType::SingleAnswer), AnswerPayload::Choice(_)) => Err(
                DomainError::validation("answer", "this quiz expects a text answer"),
            ),
            (Some(QuizType::MultipleChoice), AnswerPayload::Text(_)) => Err(
                DomainError::validation("answer", "this quiz expects a choice index"),
            ),
            (None, _) => Err(DomainError::validation("answer", "the quiz has no type")),
        }
    }

    fn add_points(&mut self, username: &str, points: u32) {
        if let Some(row) = self.score.iter_mut().find(|row| row.username == username) {
            row.points += points;
        } else {
            self.score.push(ScoreEntry {
                username: username.to_owned(),
                points,
            });
        }
    }

    fn prepare_current_question(&mut self, rng: &mut dyn DeterministicRng) {
        if self.quiz.quiz_type != Some(QuizType::MultipleChoice) {
            return;
        }
        if let Some(question) = self.remaining_questions.first() {
            let selected = select_answers(question, rng);
            self.current_choices = selected.choices;
            self.correct_choice_index = Some(selected.correct_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use quizcraft_core::quiz::INCORRECT_ANSWER_COUNT;
    use quizcraft_test_support::MockRng;

    use super::*;

    fn question(text: &str, answer: &str, decoys: usize) -> Question {
        Question {
            id: Uuid::new_v4(),
            text: text.to_owned(),
            correct_answer: answer.to_owned(),
            incorrect_answers: (0..decoys).map(|i| format!("{answer}-wrong-{i}")).collect(),
        }
    }

    fn quiz(quiz_type: QuizType, questions: Vec<Question>) -> Quiz {
        let mut quiz = Quiz::new(Uuid::new_v4(), Utc::now());
        quiz.name = "Capitals".to_owned();
        quiz.quiz_type = Some(quiz_type);
        quiz.questions = questions;
        quiz
    }

    fn settings(game_type: GameType, scoring_type: ScoringType, requested: i64) -> GameSettings {
        GameSettings {
            gm: "gm-id".to_owned(),
            game_type,
            scoring_type,
            requested_questions: requested,
            root_post_id: Some("post-1".to_owned()),
        }
    }

    fn start(quiz: Quiz, settings: GameSettings) -> Game {
        Game::start(Uuid::new_v4(), quiz, settings, Utc::now(), &mut MockRng).unwrap()
    }

    fn correct_choice(game: &Game) -> AnswerPayload {
        AnswerPayload::Choice(game.correct_choice_index.unwrap())
    }

    fn wrong_choice(game: &Game) -> AnswerPayload {
        let correct = game.correct_choice_index.unwrap();
        AnswerPayload::Choice((correct + 1) % game.current_choices.len())
    }

    #[test]
    fn test_clamp_question_count() {
        assert_eq!(clamp_question_count(0, 5), 5);
        assert_eq!(clamp_question_count(-3, 5), 5);
        assert_eq!(clamp_question_count(1000, 5), 5);
        assert_eq!(clamp_question_count(2, 5), 2);
        assert_eq!(clamp_question_count(5, 5), 5);
    }

    #[test]
    fn test_start_with_zero_request_takes_every_valid_question() {
        let q = quiz(
            QuizType::MultipleChoice,
            vec![
                question("a", "A", 3),
                question("b", "B", 1),
                question("c", "C", 4),
            ],
        );

        let game = start(q, settings(GameType::Party, ScoringType::All, 0));

        assert_eq!(game.questions_total, 2);
        assert_eq!(game.remaining_questions.len(), 2);
        assert!(
            game.remaining_questions
                .iter()
                .all(|q| q.incorrect_answers.len() >= INCORRECT_ANSWER_COUNT)
        );
    }

    #[test]
    fn test_start_clamps_large_request() {
        let q = quiz(
            QuizType::SingleAnswer,
            vec![question("a", "A", 0), question("b", "B", 0)],
        );

        let game = start(q, settings(GameType::Solo, ScoringType::All, 1000));

        assert_eq!(game.questions_total, 2);
    }

    #[test]
    fn test_start_takes_requested_prefix_of_shuffled_questions() {
        let questions = vec![
            question("a", "A", 0),
            question("b", "B", 0),
            question("c", "C", 0),
        ];
        let q = quiz(QuizType::SingleAnswer, questions.clone());

        let game = start(q, settings(GameType::Solo, ScoringType::All, 2));

        assert_eq!(game.remaining_questions.len(), 2);
        assert!(game.remaining_questions.iter().all(|q| questions.contains(q)));
        assert_ne!(game.remaining_questions[0].id, game.remaining_questions[1].id);
        assert_eq!(game.question_number(), 1);
    }

    #[test]
    fn test_start_without_valid_questions_fails() {
        let q = quiz(QuizType::MultipleChoice, vec![question("a", "A", 2)]);

        let result = Game::start(
            Uuid::new_v4(),
            q,
            settings(GameType::Solo, ScoringType::All, 0),
            Utc::now(),
            &mut MockRng,
        );

        match result.unwrap_err() {
            DomainError::Validation { field, .. } => assert_eq!(field, "quiz"),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn test_multiple_choice_start_prepares_choices_for_head() {
        let q = quiz(QuizType::MultipleChoice, vec![question("a", "A", 3)]);

        let game = start(q, settings(GameType::Solo, ScoringType::All, 0));

        let head = game.current_question().unwrap();
        let index = game.correct_choice_index.unwrap();
        assert_eq!(game.current_choices.len(), INCORRECT_ANSWER_COUNT + 1);
        assert_eq!(game.current_choices[index], head.correct_answer);
    }

    #[test]
    fn test_game_keeps_private_copy_of_quiz() {
        let mut source = quiz(QuizType::SingleAnswer, vec![question("a", "A", 0)]);
        let game = start(source.clone(), settings(GameType::Solo, ScoringType::All, 0));

        source.questions.clear();
        source.name = "Renamed".to_owned();

        assert_eq!(game.quiz.name, "Capitals");
        assert_eq!(game.remaining_questions.len(), 1);
    }

    #[test]
    fn test_first_scoring_rewards_fast_correct_answer() {
        // Arrange
        let q = quiz(QuizType::MultipleChoice, vec![question("a", "A", 3)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::First, 0));
        let qid = game.current_question().unwrap().id;
        let right = correct_choice(&game);
        let wrong = wrong_choice(&game);

        // Act
        let a = game.submit_answer(qid, "userA", "id-a", &right).unwrap();
        let b = game.submit_answer(qid, "userB", "id-b", &right).unwrap();
        let c = game.submit_answer(qid, "userC", "id-c", &wrong).unwrap();

        // Assert
        assert_eq!(a.points_awarded, 1 + FIRST_ANSWER_BONUS);
        assert_eq!(b.points_awarded, 1);
        assert!(!c.correct);
        assert_eq!(game.right_answerers, vec!["userA", "userB"]);
        assert_eq!(game.already_answered, vec!["userA", "userB", "userC"]);
        assert_eq!(
            game.score,
            vec![
                ScoreEntry { username: "userA".into(), points: 3 },
                ScoreEntry { username: "userB".into(), points: 1 },
                ScoreEntry { username: "userC".into(), points: 0 },
            ]
        );
    }

    #[test]
    fn test_first_scoring_skips_bonus_when_first_answer_is_wrong() {
        let q = quiz(QuizType::MultipleChoice, vec![question("a", "A", 3)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::First, 0));
        let qid = game.current_question().unwrap().id;
        let right = correct_choice(&game);
        let wrong = wrong_choice(&game);

        game.submit_answer(qid, "userA", "id-a", &wrong).unwrap();
        let b = game.submit_answer(qid, "userB", "id-b", &right).unwrap();

        assert_eq!(b.points_awarded, 1);
    }

    #[test]
    fn test_duplicate_answer_is_rejected_without_changing_score() {
        let q = quiz(QuizType::SingleAnswer, vec![question("a", "Lima", 0)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let qid = game.current_question().unwrap().id;
        let answer = AnswerPayload::Text("Lima".to_owned());
        game.submit_answer(qid, "ana", "id-ana", &answer).unwrap();
        let before = game.clone();

        let err = game.submit_answer(qid, "ana", "id-ana", &answer).unwrap_err();

        match err {
            DomainError::DuplicateAnswer { username } => assert_eq!(username, "ana"),
            other => panic!("expected DuplicateAnswer, got {other:?}"),
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_stale_question_is_rejected_without_mutation() {
        let q = quiz(
            QuizType::SingleAnswer,
            vec![question("a", "A", 0), question("b", "B", 0)],
        );
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let passed = game.current_question().unwrap().id;
        game.advance(&mut MockRng);
        let before = game.clone();

        let err = game
            .submit_answer(passed, "ana", "id", &AnswerPayload::Text("A".into()))
            .unwrap_err();

        match err {
            DomainError::StaleQuestion { expected, received } => {
                assert_eq!(received, passed);
                assert_eq!(expected, game.current_question().unwrap().id);
            }
            other => panic!("expected StaleQuestion, got {other:?}"),
        }
        assert_eq!(game, before);
    }

    #[test]
    fn test_payload_must_match_quiz_type() {
        let q = quiz(QuizType::SingleAnswer, vec![question("a", "A", 0)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let qid = game.current_question().unwrap().id;

        for payload in [AnswerPayload::Choice(0), AnswerPayload::Text("  ".into())] {
            match game.submit_answer(qid, "ana", "id", &payload).unwrap_err() {
                DomainError::Validation { field, .. } => assert_eq!(field, "answer"),
                other => panic!("expected Validation, got {other:?}"),
            }
        }
        assert!(game.already_answered.is_empty());
    }

    #[test]
    fn test_choice_out_of_range_is_rejected() {
        let q = quiz(QuizType::MultipleChoice, vec![question("a", "A", 3)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let qid = game.current_question().unwrap().id;

        let err = game
            .submit_answer(qid, "ana", "id", &AnswerPayload::Choice(4))
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { field: "answer", .. }));
    }

    #[test]
    fn test_text_answer_is_trimmed_and_exact() {
        let q = quiz(QuizType::SingleAnswer, vec![question("a", "Lima", 0)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let qid = game.current_question().unwrap().id;

        let hit = game
            .submit_answer(qid, "ana", "1", &AnswerPayload::Text(" Lima ".into()))
            .unwrap();
        let miss = game
            .submit_answer(qid, "bob", "2", &AnswerPayload::Text("lima".into()))
            .unwrap();

        assert!(hit.correct);
        assert!(!miss.correct);
    }

    #[test]
    fn test_advance_resets_per_question_state_and_regenerates_choices() {
        // Arrange
        let q = quiz(
            QuizType::MultipleChoice,
            vec![question("a", "A", 3), question("b", "B", 3)],
        );
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let qid = game.current_question().unwrap().id;
        let right = correct_choice(&game);
        game.submit_answer(qid, "ana", "1", &right).unwrap();

        // Act
        let advance = game.advance(&mut MockRng);

        // Assert
        assert_eq!(advance, Advance::Next);
        assert!(game.already_answered.is_empty());
        assert!(game.right_answerers.is_empty());
        let head = game.current_question().unwrap();
        assert_eq!(
            game.current_choices[game.correct_choice_index.unwrap()],
            head.correct_answer
        );
        assert_eq!(game.question_number(), 2);
        assert_eq!(game.score.len(), 1);
    }

    #[test]
    fn test_advance_records_solution_of_passed_question() {
        // Arrange
        let q = quiz(
            QuizType::SingleAnswer,
            vec![question("a", "A", 0), question("b", "B", 0)],
        );
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        let passed = game.current_question().unwrap().clone();
        let answer = AnswerPayload::Text(passed.correct_answer.clone());
        game.submit_answer(passed.id, "ana", "1", &answer).unwrap();
        game.submit_answer(passed.id, "bob", "2", &AnswerPayload::Text("nope".into()))
            .unwrap();
        assert!(game.previous_solution.is_none());

        // Act
        game.advance(&mut MockRng);

        // Assert
        assert_eq!(
            game.previous_solution,
            Some(QuestionSolution {
                question_id: passed.id,
                text: passed.text,
                correct_answer: passed.correct_answer,
                right_answerers: vec!["ana".to_owned()],
            })
        );
        assert!(game.right_answerers.is_empty());
    }

    #[test]
    fn test_advance_past_last_question_completes() {
        let q = quiz(QuizType::SingleAnswer, vec![question("a", "Lima", 0)]);
        let mut game = start(q, settings(GameType::Solo, ScoringType::All, 0));

        assert_eq!(game.advance(&mut MockRng), Advance::Completed);
        assert!(game.remaining_questions.is_empty());
        assert_eq!(
            game.previous_solution.as_ref().map(|s| s.correct_answer.as_str()),
            Some("Lima")
        );
    }

    #[test]
    fn test_winner_is_first_top_scorer_even_at_zero_points() {
        let q = quiz(QuizType::SingleAnswer, vec![question("a", "A", 0)]);
        let mut game = start(q, settings(GameType::Party, ScoringType::All, 0));
        assert!(game.winner().is_none());

        game.score = vec![
            ScoreEntry { username: "ana".into(), points: 0 },
            ScoreEntry { username: "bob".into(), points: 2 },
            ScoreEntry { username: "cy".into(), points: 2 },
        ];
        assert_eq!(game.winner().unwrap().username, "bob");

        let board_rows = game.scoreboard();
        let board: Vec<&str> = board_rows.iter().map(|r| r.username.as_str()).collect();
        assert_eq!(board, vec!["bob", "cy", "ana"]);

        game.score = vec![
            ScoreEntry { username: "ana".into(), points: 0 },
            ScoreEntry { username: "bob".into(), points: 0 },
        ];
        assert_eq!(game.winner().unwrap().username, "ana");
    }

    #[test]
    fn test_only_gm_passes_gm_check() {
        let q = quiz(QuizType::SingleAnswer, vec![question("a", "A", 0)]);
        let game = start(q, settings(GameType::Party, ScoringType::All, 0));

        assert!(game.ensure_gm("gm-id").is_ok());
        assert!(matches!(
            game.ensure_gm("someone").unwrap_err(),
            DomainError::Forbidden(_)
        ));
    }

    #[test]
    fn test_game_type_and_scoring_parse() {
        assert_eq!("party".parse::<GameType>().unwrap(), GameType::Party);
        assert_eq!("first".parse::<ScoringType>().unwrap(), ScoringType::First);
        assert!("duo".parse::<GameType>().is_err());
    }

    #[test]
    fn test_answer_payload_wire_format() {
        let text: AnswerPayload = serde_json::from_str(r#"{"text":"Lima"}"#).unwrap();
        let choice: AnswerPayload = serde_json::from_str(r#"{"choice":2}"#).unwrap();
        assert_eq!(text, AnswerPayload::Text("Lima".into()));
        assert_eq!(choice, AnswerPayload::Choice(2));
    }
}
