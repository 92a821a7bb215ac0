//! Command handlers for the Game Session context.
//!
//! Each handler serializes on the game's lock, loads the game, applies one
//! transition and either persists it or, once the last question is popped,
//! deletes the game and signals completion achievements.

use std::sync::Mutex;

use quizcraft_core::achievement::{Achievement, AchievementSink, grant_quietly};
use quizcraft_core::aggregate::{self, Aggregate};
use quizcraft_core::clock::Clock;
use quizcraft_core::error::DomainError;
use quizcraft_core::lock::AggregateLocks;
use quizcraft_core::quiz::Quiz;
use quizcraft_core::rng::DeterministicRng;
use quizcraft_core::store::KeyValueStore;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::query_handlers::{GameResult, GameView};
use crate::domain::aggregates::{Advance, Game, GameSettings, GameType};
use crate::domain::commands::{AttachPost, NextQuestion, StartGame, SubmitAnswer};

/// State of a session after a transition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SessionState {
    /// The game goes on; render this question.
    InProgress(GameView),
    /// The game is over and has been deleted.
    Completed(GameResult),
}

/// Result of a submitted answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResult {
    pub correct: bool,
    pub points_awarded: u32,
    pub session: SessionState,
}

/// Runs `f` with the shared RNG locked. The guard never outlives the call,
/// so it is never held across an await point.
fn with_rng<T>(
    rng: &Mutex<dyn DeterministicRng + Send>,
    f: impl FnOnce(&mut dyn DeterministicRng) -> T,
) -> Result<T, DomainError> {
    let mut guard = rng
        .lock()
        .map_err(|e| DomainError::Persistence(format!("RNG mutex poisoned: {e}")))?;
    Ok(f(&mut *guard))
}

/// Deletes a finished game and signals its achievements.
async fn finish(
    game: &Game,
    acting_user_id: &str,
    store: &dyn KeyValueStore,
    achievements: &dyn AchievementSink,
) -> Result<GameResult, DomainError> {
    aggregate::delete::<Game>(store, game.id).await?;

    match game.game_type {
        GameType::Solo => {
            grant_quietly(achievements, Achievement::HardWorker, acting_user_id).await;
        }
        GameType::Party => {
            if let Some(winner) = game.winner() {
                match game.players.get(&winner.username) {
                    Some(user_id) => {
                        grant_quietly(achievements, Achievement::Winner, user_id).await;
                    }
                    None => debug!(username = %winner.username, "winner has no known user id"),
                }
            }
        }
    }

    let result = GameResult::from(game);
    info!(
        game_id = %game.id,
        game_type = %game.game_type,
        winner = result.winner.as_deref().unwrap_or(""),
        "game completed"
    );
    Ok(result)
}

/// Advances `game` and persists or finishes it.
async fn advance_and_store(
    mut game: Game,
    acting_user_id: &str,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn KeyValueStore,
    achievements: &dyn AchievementSink,
) -> Result<SessionState, DomainError> {
    match with_rng(rng, |rng| game.advance(rng))? {
        Advance::Completed => Ok(SessionState::Completed(
            finish(&game, acting_user_id, store, achievements).await?,
        )),
        Advance::Next => {
            aggregate::save(store, &game).await?;
            debug!(
                game_id = %game.id,
                question_number = game.question_number(),
                "advanced to next question"
            );
            Ok(SessionState::InProgress(GameView::from(&game)))
        }
    }
}

/// Handles the `StartGame` command: snapshots the quiz into a new game and
/// persists it under a fresh id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the quiz does not exist,
/// `DomainError::Validation` if it has no valid question, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    rng: &Mutex<dyn DeterministicRng + Send>,
    store: &dyn KeyValueStore,
) -> Result<GameView, DomainError> {
    let quiz: Quiz = aggregate::load_existing(store, command.quiz_id).await?;
    let settings = GameSettings {
        gm: command.gm_user_id.clone(),
        game_type: command.game_type,
        scoring_type: command.scoring_type,
        requested_questions: command.question_count,
        root_post_id: command.root_post_id.clone(),
    };

    let game = with_rng(rng, |rng| {
        Game::start(Uuid::new_v4(), quiz, settings, clock.now(), rng)
    })??;
    aggregate::save(store, &game).await?;

    info!(
        correlation_id = %command.correlation_id,
        game_id = %game.id,
        quiz_id = %command.quiz_id,
        questions = game.questions_total,
        "game started"
    );
    Ok(GameView::from(&game))
}

/// Handles the `SubmitAnswer` command.
///
/// Party games only record the answer. Solo games also move on to the next
/// question, right or wrong, and finish after the last one.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game does not exist,
/// `DomainError::StaleQuestion` if the question was already passed,
/// `DomainError::DuplicateAnswer` if the player already answered,
/// `DomainError::Validation` for a malformed answer, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_submit_answer(
    command: &SubmitAnswer,
    rng: &Mutex<dyn DeterministicRng + Send>,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
    achievements: &dyn AchievementSink,
) -> Result<AnswerResult, DomainError> {
    let _guard = locks.acquire(&Game::storage_key(command.game_id)).await;
    let mut game: Game = aggregate::load_existing(store, command.game_id).await?;

    let outcome = game.submit_answer(
        command.question_id,
        &command.username,
        &command.user_id,
        &command.answer,
    )?;
    debug!(
        correlation_id = %command.correlation_id,
        game_id = %game.id,
        username = %command.username,
        correct = outcome.correct,
        points = outcome.points_awarded,
        "answer recorded"
    );

    let session = match game.game_type {
        GameType::Party => {
            aggregate::save(store, &game).await?;
            SessionState::InProgress(GameView::from(&game))
        }
        GameType::Solo => {
            advance_and_store(game, &command.user_id, rng, store, achievements).await?
        }
    };

    Ok(AnswerResult {
        correct: outcome.correct,
        points_awarded: outcome.points_awarded,
        session,
    })
}

/// Handles the `NextQuestion` command: the GM forces the game past the
/// current question.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if the game does not exist,
/// `DomainError::Forbidden` if the caller is not the GM,
/// `DomainError::StaleQuestion` if the question was already passed, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_next_question(
    command: &NextQuestion,
    rng: &Mutex<dyn DeterministicRng + Send>,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
    achievements: &dyn AchievementSink,
) -> Result<SessionState, DomainError> {
    let _guard = locks.acquire(&Game::storage_key(command.game_id)).await;
    let game: Game = aggregate::load_existing(store, command.game_id).await?;
    game.ensure_gm(&command.user_id)?;
    game.ensure_current(command.question_id)?;

    debug!(
        correlation_id = %command.correlation_id,
        game_id = %game.id,
        "game master skipped to next question"
    );
    advance_and_store(game, &command.user_id, rng, store, achievements).await
}

/// Handles the `AttachPost` command: records which post now shows the game.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the post id is blank,
/// `DomainError::NotFound` if the game does not exist, or
/// `DomainError::Persistence` if the store fails.
pub async fn handle_attach_post(
    command: &AttachPost,
    locks: &AggregateLocks,
    store: &dyn KeyValueStore,
) -> Result<GameView, DomainError> {
    let post_id = command.post_id.trim();
    if post_id.is_empty() {
        return Err(DomainError::validation("post_id", "must not be empty"));
    }

    let _guard = locks.acquire(&Game::storage_key(command.game_id)).await;
    let mut game: Game = aggregate::load_existing(store, command.game_id).await?;
    game.attach_post(post_id.to_owned());
    aggregate::save(store, &game).await?;
    Ok(GameView::from(&game))
}
