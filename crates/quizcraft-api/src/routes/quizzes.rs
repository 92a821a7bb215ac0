//! Routes for quiz authoring.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use quizcraft_authoring::application::command_handlers::{self, PublishOutcome};
use quizcraft_authoring::application::query_handlers::{self, QuizSummary, QuizView};
use quizcraft_authoring::domain::commands;
use quizcraft_core::quiz::QuizType;

use crate::error::ApiError;
use crate::extract::ActingUser;
use crate::state::AppState;

/// Request body for PUT /{quiz_id}/name.
#[derive(Debug, Deserialize)]
pub struct RenameQuizRequest {
    pub name: String,
}

/// Request body for PUT /{quiz_id}/type.
#[derive(Debug, Deserialize)]
pub struct SetQuizTypeRequest {
    #[serde(rename = "type")]
    pub quiz_type: QuizType,
}

/// Request body for POST /{quiz_id}/questions.
#[derive(Debug, Deserialize)]
pub struct AddQuestionRequest {
    pub text: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

/// Request body for POST /{quiz_id}/questions/remove.
#[derive(Debug, Deserialize)]
pub struct RemoveQuestionsRequest {
    pub question_ids: Vec<Uuid>,
}

/// Response body for POST /{quiz_id}/questions.
#[derive(Debug, Serialize)]
pub struct QuestionAddedResponse {
    pub question_id: Uuid,
    pub quiz: QuizView,
}

/// Response body for POST /{quiz_id}/questions/remove.
#[derive(Debug, Serialize)]
pub struct QuestionsRemovedResponse {
    pub removed: usize,
    pub quiz: QuizView,
}

/// Response body for publish endpoints.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub id: Uuid,
    pub newly_listed: bool,
}

impl From<PublishOutcome> for PublishResponse {
    fn from(outcome: PublishOutcome) -> Self {
        Self {
            id: outcome.id,
            newly_listed: outcome.newly_listed,
        }
    }
}

/// POST /
#[instrument(skip(state))]
async fn create_quiz(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<QuizView>), ApiError> {
    let command = commands::CreateQuiz {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_quiz command");

    let quiz =
        command_handlers::handle_create_quiz(&command, state.clock.as_ref(), &*state.store).await?;

    Ok((StatusCode::CREATED, Json(QuizView::from(&quiz))))
}

/// GET /
async fn list_quizzes(State(state): State<AppState>) -> Result<Json<Vec<QuizSummary>>, ApiError> {
    let quizzes = query_handlers::list_available_quizzes(&*state.store).await?;
    Ok(Json(quizzes))
}

/// GET /{quiz_id}
async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<Json<QuizView>, ApiError> {
    let view = query_handlers::get_quiz(quiz_id, &*state.store).await?;
    Ok(Json(view))
}

/// PUT /{quiz_id}/name
#[instrument(skip(state, request), fields(quiz_id = %quiz_id))]
async fn rename_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<RenameQuizRequest>,
) -> Result<Json<QuizView>, ApiError> {
    let command = commands::RenameQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling rename_quiz command");

    let quiz = command_handlers::handle_rename_quiz(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(QuizView::from(&quiz)))
}

/// PUT /{quiz_id}/type
#[instrument(skip(state, request), fields(quiz_id = %quiz_id))]
async fn set_quiz_type(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<SetQuizTypeRequest>,
) -> Result<Json<QuizView>, ApiError> {
    let command = commands::SetQuizType {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        quiz_type: request.quiz_type,
    };

    info!(correlation_id = %command.correlation_id, "handling set_quiz_type command");

    let quiz = command_handlers::handle_set_quiz_type(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(QuizView::from(&quiz)))
}

/// POST /{quiz_id}/questions
#[instrument(skip(state, request), fields(quiz_id = %quiz_id))]
async fn add_question(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<AddQuestionRequest>,
) -> Result<(StatusCode, Json<QuestionAddedResponse>), ApiError> {
    let command = commands::AddQuestion {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        text: request.text,
        correct_answer: request.correct_answer,
        incorrect_answers: request.incorrect_answers,
    };

    info!(correlation_id = %command.correlation_id, "handling add_question command");

    let added = command_handlers::handle_add_question(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(QuestionAddedResponse {
            question_id: added.question_id,
            quiz: QuizView::from(&added.quiz),
        }),
    ))
}

/// POST /{quiz_id}/questions/remove
#[instrument(skip(state, request), fields(quiz_id = %quiz_id))]
async fn remove_questions(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    Json(request): Json<RemoveQuestionsRequest>,
) -> Result<Json<QuestionsRemovedResponse>, ApiError> {
    let command = commands::RemoveQuestions {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        question_ids: request.question_ids,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_questions command");

    let removed = command_handlers::handle_remove_questions(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(QuestionsRemovedResponse {
        removed: removed.removed,
        quiz: QuizView::from(&removed.quiz),
    }))
}

/// POST /{quiz_id}/publish
#[instrument(skip(state, user), fields(quiz_id = %quiz_id))]
async fn publish_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
    user: ActingUser,
) -> Result<Json<PublishResponse>, ApiError> {
    let command = commands::PublishQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
        user_id: user.user_id,
    };

    info!(correlation_id = %command.correlation_id, "handling publish_quiz command");

    let outcome = command_handlers::handle_publish_quiz(
        &command,
        &state.locks,
        &*state.store,
        &*state.achievements,
    )
    .await?;

    Ok(Json(outcome.into()))
}

/// DELETE /{quiz_id}
#[instrument(skip(state), fields(quiz_id = %quiz_id))]
async fn discard_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DiscardQuiz {
        correlation_id: Uuid::new_v4(),
        quiz_id,
    };

    info!(correlation_id = %command.correlation_id, "handling discard_quiz command");

    command_handlers::handle_discard_quiz(&command, &state.locks, &*state.store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for quiz authoring.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_quiz).get(list_quizzes))
        .route("/{quiz_id}", get(get_quiz).delete(discard_quiz))
        .route("/{quiz_id}/name", put(rename_quiz))
        .route("/{quiz_id}/type", put(set_quiz_type))
        .route("/{quiz_id}/questions", post(add_question))
        .route("/{quiz_id}/questions/remove", post(remove_questions))
        .route("/{quiz_id}/publish", post(publish_quiz))
}
