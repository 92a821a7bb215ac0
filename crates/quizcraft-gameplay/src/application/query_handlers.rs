//! Query handlers for the Game Session context.
//!
//! The views here double as the rendering payload returned by the command
//! handlers. Everything in them is derived from the persisted game alone.

use chrono::{DateTime, Utc};
use quizcraft_core::aggregate;
use quizcraft_core::error::DomainError;
use quizcraft_core::store::KeyValueStore;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::aggregates::{Game, GameType, QuestionSolution, ScoreEntry, ScoringType};

/// Read-only view of a running game.
///
/// The correct choice is deliberately absent; players must not see it.
#[derive(Debug, Clone, Serialize)]
pub struct GameView {
    pub game_id: Uuid,
    pub quiz_id: Uuid,
    pub quiz_name: String,
    pub game_type: GameType,
    pub scoring_type: ScoringType,
    pub gm: String,
    pub question_id: Option<Uuid>,
    pub question_text: Option<String>,
    /// Options in display order; empty for single-answer quizzes.
    pub choices: Vec<String>,
    /// 1-based position of the current question.
    pub question_number: usize,
    pub questions_total: usize,
    pub already_answered: Vec<String>,
    pub right_answerers: Vec<String>,
    /// Answer to the question just passed, shown before the new one.
    pub previous_solution: Option<QuestionSolution>,
    pub root_post_id: Option<String>,
    pub current_post_id: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl From<&Game> for GameView {
    fn from(game: &Game) -> Self {
        let question = game.current_question();
        Self {
            game_id: game.id,
            quiz_id: game.quiz.id,
            quiz_name: game.quiz.name.clone(),
            game_type: game.game_type,
            scoring_type: game.scoring_type,
            gm: game.gm.clone(),
            question_id: question.map(|q| q.id),
            question_text: question.map(|q| q.text.clone()),
            choices: game.current_choices.clone(),
            question_number: game.question_number(),
            questions_total: game.questions_total,
            already_answered: game.already_answered.clone(),
            right_answerers: game.right_answerers.clone(),
            previous_solution: game.previous_solution.clone(),
            root_post_id: game.root_post_id.clone(),
            current_post_id: game.current_post_id.clone(),
            started_at: game.started_at,
        }
    }
}

/// Final standings of a completed game.
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub game_id: Uuid,
    pub quiz_name: String,
    pub game_type: GameType,
    /// Sorted by points, highest first.
    pub scores: Vec<ScoreEntry>,
    /// Username of the party winner, if anyone answered.
    pub winner: Option<String>,
    /// Answer to the final question.
    pub last_solution: Option<QuestionSolution>,
}

impl From<&Game> for GameResult {
    fn from(game: &Game) -> Self {
        Self {
            game_id: game.id,
            quiz_name: game.quiz.name.clone(),
            game_type: game.game_type,
            scores: game.scoreboard(),
            winner: match game.game_type {
                GameType::Party => game.winner().map(|row| row.username.clone()),
                GameType::Solo => None,
            },
            last_solution: game.previous_solution.clone(),
        }
    }
}

/// Current scores of a running game.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreboardView {
    pub game_id: Uuid,
    pub question_number: usize,
    pub questions_total: usize,
    /// Sorted by points, highest first; ties in first-answer order.
    pub rows: Vec<ScoreEntry>,
}

/// Retrieves the rendering payload of a running game.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game does not exist (including
/// games that already completed), or `DomainError::Persistence` if the store
/// fails.
pub async fn get_game(game_id: Uuid, store: &dyn KeyValueStore) -> Result<GameView, DomainError> {
    let game: Game = aggregate::load_existing(store, game_id).await?;
    Ok(GameView::from(&game))
}

/// Retrieves the score table of a running game.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn get_scoreboard(
    game_id: Uuid,
    store: &dyn KeyValueStore,
) -> Result<ScoreboardView, DomainError> {
    let game: Game = aggregate::load_existing(store, game_id).await?;
    Ok(ScoreboardView {
        game_id,
        question_number: game.question_number(),
        questions_total: game.questions_total,
        rows: game.scoreboard(),
    })
}
