//! Quizcraft API — HTTP adapter over the authoring and gameplay contexts.

pub mod achievements;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::error::ErrorBody;
use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    // TODO: Replace CorsLayer::permissive() with the chat host's origin once it is configurable.
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/quizzes", routes::quizzes::router())
        .nest("/api/v1/courses", routes::courses::router())
        .nest("/api/v1/games", routes::games::router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Turns a panic inside one request into an opaque 500 for that request.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::internal("internal_error")),
    )
        .into_response()
}
