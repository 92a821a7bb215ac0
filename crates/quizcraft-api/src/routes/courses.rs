//! Routes for course authoring.
//!
//! Lessons and resources are addressed by position, as shown to the author.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use quizcraft_authoring::application::command_handlers;
use quizcraft_authoring::application::query_handlers::{
    self, CourseSummary, CourseView, LessonView,
};
use quizcraft_authoring::domain::aggregates::NewResource;
use quizcraft_authoring::domain::commands;
use quizcraft_core::course::ResourceType;

use crate::error::ApiError;
use crate::routes::quizzes::PublishResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DescribeCourseRequest {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct AddLessonRequest {
    pub name: String,
    pub introduction: String,
}

#[derive(Debug, Deserialize)]
pub struct SetIntroductionRequest {
    pub introduction: String,
}

#[derive(Debug, Deserialize)]
pub struct AddResourceRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    pub content: String,
    #[serde(default)]
    pub pretext: String,
}

#[derive(Debug, Deserialize)]
pub struct RemoveResourcesRequest {
    pub positions: Vec<usize>,
}

/// POST /
#[instrument(skip(state))]
async fn create_course(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CourseView>), ApiError> {
    let command = commands::CreateCourse {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_course command");

    let course =
        command_handlers::handle_create_course(&command, state.clock.as_ref(), &*state.store)
            .await?;

    Ok((StatusCode::CREATED, Json(CourseView::from(&course))))
}

/// GET /
async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseSummary>>, ApiError> {
    let courses = query_handlers::list_available_courses(&*state.store).await?;
    Ok(Json(courses))
}

/// GET /{course_id}
async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<CourseView>, ApiError> {
    let view = query_handlers::get_course(course_id, &*state.store).await?;
    Ok(Json(view))
}

/// PUT /{course_id}/name
#[instrument(skip(state, request), fields(course_id = %course_id))]
async fn rename_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<CourseView>, ApiError> {
    let command = commands::RenameCourse {
        correlation_id: Uuid::new_v4(),
        course_id,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling rename_course command");

    let course = command_handlers::handle_rename_course(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(CourseView::from(&course)))
}

/// PUT /{course_id}/description
#[instrument(skip(state, request), fields(course_id = %course_id))]
async fn describe_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<DescribeCourseRequest>,
) -> Result<Json<CourseView>, ApiError> {
    let command = commands::DescribeCourse {
        correlation_id: Uuid::new_v4(),
        course_id,
        description: request.description,
    };

    info!(correlation_id = %command.correlation_id, "handling describe_course command");

    let course = command_handlers::handle_describe_course(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(CourseView::from(&course)))
}

/// POST /{course_id}/lessons
#[instrument(skip(state, request), fields(course_id = %course_id))]
async fn add_lesson(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
    Json(request): Json<AddLessonRequest>,
) -> Result<(StatusCode, Json<CourseView>), ApiError> {
    let command = commands::AddLesson {
        correlation_id: Uuid::new_v4(),
        course_id,
        name: request.name,
        introduction: request.introduction,
    };

    info!(correlation_id = %command.correlation_id, "handling add_lesson command");

    let course = command_handlers::handle_add_lesson(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CourseView::from(&course))))
}

/// GET /{course_id}/lessons/{index}
async fn get_lesson(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<LessonView>, ApiError> {
    let view = query_handlers::get_lesson(course_id, index, &*state.store).await?;
    Ok(Json(view))
}

/// PUT /{course_id}/lessons/{index}/name
#[instrument(skip(state, request), fields(course_id = %course_id, lesson_index = index))]
async fn rename_lesson(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(Uuid, usize)>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<CourseView>, ApiError> {
    let command = commands::RenameLesson {
        correlation_id: Uuid::new_v4(),
        course_id,
        lesson_index: index,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling rename_lesson command");

    let course = command_handlers::handle_rename_lesson(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(CourseView::from(&course)))
}

/// PUT /{course_id}/lessons/{index}/introduction
#[instrument(skip(state, request), fields(course_id = %course_id, lesson_index = index))]
async fn set_lesson_introduction(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(Uuid, usize)>,
    Json(request): Json<SetIntroductionRequest>,
) -> Result<Json<CourseView>, ApiError> {
    let command = commands::SetLessonIntroduction {
        correlation_id: Uuid::new_v4(),
        course_id,
        lesson_index: index,
        introduction: request.introduction,
    };

    info!(
        correlation_id = %command.correlation_id,
        "handling set_lesson_introduction command"
    );

    let course = command_handlers::handle_set_lesson_introduction(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(CourseView::from(&course)))
}

/// DELETE /{course_id}/lessons/{index}
#[instrument(skip(state), fields(course_id = %course_id, lesson_index = index))]
async fn delete_lesson(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(Uuid, usize)>,
) -> Result<Json<CourseView>, ApiError> {
    let command = commands::DeleteLesson {
        correlation_id: Uuid::new_v4(),
        course_id,
        lesson_index: index,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_lesson command");

    let course = command_handlers::handle_delete_lesson(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;

    Ok(Json(CourseView::from(&course)))
}

/// POST /{course_id}/lessons/{index}/resources
#[instrument(skip(state, request), fields(course_id = %course_id, lesson_index = index))]
async fn add_resource(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(Uuid, usize)>,
    Json(request): Json<AddResourceRequest>,
) -> Result<(StatusCode, Json<LessonView>), ApiError> {
    let command = commands::AddResource {
        correlation_id: Uuid::new_v4(),
        course_id,
        lesson_index: index,
        resource: NewResource {
            name: request.name,
            resource_type: request.resource_type,
            content: request.content,
            pretext: request.pretext,
        },
    };

    info!(correlation_id = %command.correlation_id, "handling add_resource command");

    let course = command_handlers::handle_add_resource(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;
    let lesson = course.lesson(index)?;

    Ok((StatusCode::CREATED, Json(LessonView::new(index, lesson))))
}

/// POST /{course_id}/lessons/{index}/resources/remove
#[instrument(skip(state, request), fields(course_id = %course_id, lesson_index = index))]
async fn remove_resources(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(Uuid, usize)>,
    Json(request): Json<RemoveResourcesRequest>,
) -> Result<Json<LessonView>, ApiError> {
    let command = commands::RemoveResources {
        correlation_id: Uuid::new_v4(),
        course_id,
        lesson_index: index,
        positions: request.positions,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_resources command");

    let course = command_handlers::handle_remove_resources(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.store,
    )
    .await?;
    let lesson = course.lesson(index)?;

    Ok(Json(LessonView::new(index, lesson)))
}

/// POST /{course_id}/publish
#[instrument(skip(state), fields(course_id = %course_id))]
async fn publish_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<Json<PublishResponse>, ApiError> {
    let command = commands::PublishCourse {
        correlation_id: Uuid::new_v4(),
        course_id,
    };

    info!(correlation_id = %command.correlation_id, "handling publish_course command");

    let outcome =
        command_handlers::handle_publish_course(&command, &state.locks, &*state.store).await?;

    Ok(Json(outcome.into()))
}

/// DELETE /{course_id}
#[instrument(skip(state), fields(course_id = %course_id))]
async fn discard_course(
    State(state): State<AppState>,
    Path(course_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let command = commands::DiscardCourse {
        correlation_id: Uuid::new_v4(),
        course_id,
    };

    info!(correlation_id = %command.correlation_id, "handling discard_course command");

    command_handlers::handle_discard_course(&command, &state.locks, &*state.store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for course authoring.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_course).get(list_courses))
        .route("/{course_id}", get(get_course).delete(discard_course))
        .route("/{course_id}/name", put(rename_course))
        .route("/{course_id}/description", put(describe_course))
        .route("/{course_id}/publish", post(publish_course))
        .route("/{course_id}/lessons", post(add_lesson))
        .route(
            "/{course_id}/lessons/{index}",
            get(get_lesson).delete(delete_lesson),
        )
        .route("/{course_id}/lessons/{index}/name", put(rename_lesson))
        .route(
            "/{course_id}/lessons/{index}/introduction",
            put(set_lesson_introduction),
        )
        .route("/{course_id}/lessons/{index}/resources", post(add_resource))
        .route(
            "/{course_id}/lessons/{index}/resources/remove",
            post(remove_resources),
        )
}
