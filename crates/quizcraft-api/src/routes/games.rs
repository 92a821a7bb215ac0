//! Routes for the Game Session context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use quizcraft_gameplay::application::command_handlers::{
    self, AnswerResult, SessionState,
};
use quizcraft_gameplay::application::query_handlers::{self, GameView, ScoreboardView};
use quizcraft_gameplay::domain::aggregates::{AnswerPayload, GameType, ScoringType};
use quizcraft_gameplay::domain::commands;

use crate::error::ApiError;
use crate::extract::ActingUser;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub quiz_id: Uuid,
    pub game_type: GameType,
    pub scoring_type: ScoringType,
    /// Out-of-range or absent means every valid question.
    #[serde(default)]
    pub question_count: i64,
    #[serde(default)]
    pub root_post_id: Option<String>,
}

/// Request body for POST /{game_id}/answers.
#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub question_id: Uuid,
    pub answer: AnswerPayload,
}

/// Request body for POST /{game_id}/next.
#[derive(Debug, Deserialize)]
pub struct NextQuestionRequest {
    pub question_id: Uuid,
}

/// Request body for PUT /{game_id}/post.
#[derive(Debug, Deserialize)]
pub struct AttachPostRequest {
    pub post_id: String,
}

/// POST /
#[instrument(skip(state, user, request), fields(quiz_id = %request.quiz_id))]
async fn start_game(
    State(state): State<AppState>,
    user: ActingUser,
    Json(request): Json<StartGameRequest>,
) -> Result<(StatusCode, Json<GameView>), ApiError> {
    let command = commands::StartGame {
        correlation_id: Uuid::new_v4(),
        quiz_id: request.quiz_id,
        gm_user_id: user.user_id,
        game_type: request.game_type,
        scoring_type: request.scoring_type,
        question_count: request.question_count,
        root_post_id: request.root_post_id,
    };

    info!(correlation_id = %command.correlation_id, "handling start_game command");

    let view = command_handlers::handle_start_game(
        &command,
        state.clock.as_ref(),
        state.rng.as_ref(),
        &*state.store,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /{game_id}
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let view = query_handlers::get_game(game_id, &*state.store).await?;
    Ok(Json(view))
}

/// GET /{game_id}/scoreboard
async fn get_scoreboard(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<ScoreboardView>, ApiError> {
    let view = query_handlers::get_scoreboard(game_id, &*state.store).await?;
    Ok(Json(view))
}

/// POST /{game_id}/answers
#[instrument(skip(state, user, request), fields(game_id = %game_id, username = %user.username))]
async fn submit_answer(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    user: ActingUser,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<Json<AnswerResult>, ApiError> {
    let command = commands::SubmitAnswer {
        correlation_id: Uuid::new_v4(),
        game_id,
        question_id: request.question_id,
        user_id: user.user_id,
        username: user.username,
        answer: request.answer,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_answer command");

    let result = command_handlers::handle_submit_answer(
        &command,
        state.rng.as_ref(),
        &state.locks,
        &*state.store,
        &*state.achievements,
    )
    .await?;

    Ok(Json(result))
}

/// POST /{game_id}/next
#[instrument(skip(state, user, request), fields(game_id = %game_id))]
async fn next_question(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    user: ActingUser,
    Json(request): Json<NextQuestionRequest>,
) -> Result<Json<SessionState>, ApiError> {
    let command = commands::NextQuestion {
        correlation_id: Uuid::new_v4(),
        game_id,
        question_id: request.question_id,
        user_id: user.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling next_question command");

    let session = command_handlers::handle_next_question(
        &command,
        state.rng.as_ref(),
        &state.locks,
        &*state.store,
        &*state.achievements,
    )
    .await?;

    Ok(Json(session))
}

/// PUT /{game_id}/post
#[instrument(skip(state, request), fields(game_id = %game_id))]
async fn attach_post(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<AttachPostRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = commands::AttachPost {
        correlation_id: Uuid::new_v4(),
        game_id,
        post_id: request.post_id,
    };

    info!(correlation_id = %command.correlation_id, "handling attach_post command");

    let view = command_handlers::handle_attach_post(&command, &state.locks, &*state.store).await?;

    Ok(Json(view))
}

/// Returns the router for game sessions.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(start_game))
        .route("/{game_id}", get(get_game))
        .route("/{game_id}/scoreboard", get(get_scoreboard))
        .route("/{game_id}/answers", post(submit_answer))
        .route("/{game_id}/next", post(next_question))
        .route("/{game_id}/post", put(attach_post))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::Request;
    use chrono::Utc;
    use quizcraft_core::achievement::AchievementSink;
    use quizcraft_core::aggregate;
    use quizcraft_core::clock::Clock;
    use quizcraft_core::quiz::{Question, Quiz, QuizType};
    use quizcraft_core::rng::DeterministicRng;
    use quizcraft_test_support::{FixedClock, MockRng, RecordingAchievements, RecordingStore};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::extract::{USER_ID_HEADER, USERNAME_HEADER};

    async fn seeded_state() -> (AppState, Uuid) {
        let store = Arc::new(RecordingStore::new());
        let mut quiz = Quiz::new(Uuid::new_v4(), Utc::now());
        quiz.name = "Capitals".to_owned();
        quiz.quiz_type = Some(QuizType::SingleAnswer);
        quiz.questions = vec![Question {
            id: Uuid::new_v4(),
            text: "Capital of Peru?".to_owned(),
            correct_answer: "Lima".to_owned(),
            incorrect_answers: Vec::new(),
        }];
        aggregate::save(store.as_ref(), &quiz).await.unwrap();

        let clock: Arc<dyn Clock> = Arc::new(FixedClock(Utc::now()));
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        let achievements: Arc<dyn AchievementSink> = Arc::new(RecordingAchievements::new());
        (AppState::new(store, clock, rng, achievements), quiz.id)
    }

    fn post_as(user: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header(USER_ID_HEADER, format!("{user}-id"))
            .header(USERNAME_HEADER, user)
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_start_game_returns_201_with_first_question() {
        // Arrange
        let (state, quiz_id) = seeded_state().await;
        let app = router().with_state(state);
        let body = serde_json::json!({
            "quiz_id": quiz_id,
            "game_type": "party",
            "scoring_type": "first",
        });

        // Act
        let response = app.oneshot(post_as("gm", "/", &body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = read_json(response).await;
        assert_eq!(json["gm"], "gm-id");
        assert_eq!(json["question_text"], "Capital of Peru?");
        assert_eq!(json["questions_total"], 1);
        assert!(json.get("correct_choice_index").is_none());
    }

    #[tokio::test]
    async fn test_start_game_returns_404_for_unknown_quiz() {
        let (state, _) = seeded_state().await;
        let app = router().with_state(state);
        let body = serde_json::json!({
            "quiz_id": Uuid::new_v4(),
            "game_type": "solo",
            "scoring_type": "all",
        });

        let response = app.oneshot(post_as("gm", "/", &body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_duplicate_answer_returns_409() {
        // Arrange
        let (state, quiz_id) = seeded_state().await;
        let app = router().with_state(state);
        let start = serde_json::json!({
            "quiz_id": quiz_id,
            "game_type": "party",
            "scoring_type": "all",
        });
        let game = read_json(app.clone().oneshot(post_as("gm", "/", &start)).await.unwrap()).await;
        let uri = format!("/{}/answers", game["game_id"].as_str().unwrap());
        let answer = serde_json::json!({
            "question_id": game["question_id"],
            "answer": { "text": "Lima" },
        });
        let first = app
            .clone()
            .oneshot(post_as("ana", &uri, &answer))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        // Act
        let second = app.oneshot(post_as("ana", &uri, &answer)).await.unwrap();

        // Assert
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(read_json(second).await["error"], "duplicate_answer");
    }

    #[tokio::test]
    async fn test_next_question_by_player_returns_403() {
        let (state, quiz_id) = seeded_state().await;
        let app = router().with_state(state);
        let start = serde_json::json!({
            "quiz_id": quiz_id,
            "game_type": "party",
            "scoring_type": "all",
        });
        let game = read_json(app.clone().oneshot(post_as("gm", "/", &start)).await.unwrap()).await;
        let uri = format!("/{}/next", game["game_id"].as_str().unwrap());

        let response = app
            .oneshot(post_as(
                "ana",
                &uri,
                &serde_json::json!({ "question_id": game["question_id"] }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_solo_answer_completes_single_question_game() {
        let (state, quiz_id) = seeded_state().await;
        let app = router().with_state(state);
        let start = serde_json::json!({
            "quiz_id": quiz_id,
            "game_type": "solo",
            "scoring_type": "all",
        });
        let game = read_json(app.clone().oneshot(post_as("ana", "/", &start)).await.unwrap()).await;
        let game_id = game["game_id"].as_str().unwrap().to_owned();

        let response = app
            .clone()
            .oneshot(post_as(
                "ana",
                &format!("/{game_id}/answers"),
                &serde_json::json!({
                    "question_id": game["question_id"],
                    "answer": { "text": "Lima" },
                }),
            ))
            .await
            .unwrap();
        let json = read_json(response).await;
        let lookup = app
            .oneshot(
                Request::builder()
                    .uri(format!("/{game_id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(json["correct"], true);
        assert_eq!(json["session"]["status"], "completed");
        assert_eq!(json["session"]["scores"][0]["points"], 1);
        assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
    }
}
