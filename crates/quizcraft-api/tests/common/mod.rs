//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use quizcraft_core::clock::Clock;
use quizcraft_core::rng::DeterministicRng;
use quizcraft_core::store::KeyValueStore;
use quizcraft_store::{MemoryStore, PgStore};
use quizcraft_test_support::{FixedClock, MockRng, RecordingAchievements};
use sqlx::PgPool;
use tower::ServiceExt;

use quizcraft_api::extract::{USER_ID_HEADER, USERNAME_HEADER};
use quizcraft_api::state::AppState;

/// The full router plus the achievement grants it produced.
pub struct TestApp {
    pub router: Router,
    pub achievements: Arc<RecordingAchievements>,
}

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(
        chrono::TimeZone::with_ymd_and_hms(&chrono::Utc, 2026, 1, 15, 10, 0, 0).unwrap(),
    ))
}

fn build_with_store(store: Arc<dyn KeyValueStore>) -> TestApp {
    let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
    let achievements = Arc::new(RecordingAchievements::new());
    let app_state = AppState::new(store, fixed_clock(), rng, achievements.clone());

    TestApp {
        router: quizcraft_api::app(app_state),
        achievements,
    }
}

/// Build the full app over a fresh `MemoryStore` with a deterministic clock
/// and RNG. Uses the same route structure as `main.rs`.
pub fn build_test_app() -> TestApp {
    build_with_store(Arc::new(MemoryStore::new()))
}

/// Build the full app over a real `PgStore`.
pub fn build_pg_test_app(pool: PgPool) -> TestApp {
    build_with_store(Arc::new(PgStore::new(pool)))
}

/// Send a request as `user` (if any) and return the status and JSON body.
/// Empty bodies come back as `Value::Null`.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<&serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder
            .header(USER_ID_HEADER, format!("{user}-id"))
            .header(USERNAME_HEADER, user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &Router,
    uri: &str,
    user: Option<&str>,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, user, Some(body)).await
}

/// Send a PUT request with a JSON body and return the response.
pub async fn put_json(
    app: &Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, None, Some(body)).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None, None).await
}

/// Create a published single-answer quiz through the API and return its id.
pub async fn publish_single_answer_quiz(
    app: &Router,
    name: &str,
    questions: &[(&str, &str)],
) -> String {
    let (_, quiz) = send(app, "POST", "/api/v1/quizzes", None, None).await;
    let quiz_id = quiz["quiz_id"].as_str().unwrap().to_owned();
    put_json(
        app,
        &format!("/api/v1/quizzes/{quiz_id}/name"),
        &serde_json::json!({ "name": name }),
    )
    .await;
    put_json(
        app,
        &format!("/api/v1/quizzes/{quiz_id}/type"),
        &serde_json::json!({ "type": "single-answer" }),
    )
    .await;
    for (text, answer) in questions {
        post_json(
            app,
            &format!("/api/v1/quizzes/{quiz_id}/questions"),
            None,
            &serde_json::json!({ "text": text, "correct_answer": answer }),
        )
        .await;
    }
    let (status, _) = send(
        app,
        "POST",
        &format!("/api/v1/quizzes/{quiz_id}/publish"),
        Some("author"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    quiz_id
}
