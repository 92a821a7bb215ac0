//! Integration tests for game sessions.

mod common;

use axum::http::StatusCode;
use quizcraft_core::achievement::Achievement;
use serde_json::{Value, json};

async fn start_game(app: &common::TestApp, gm: &str, quiz_id: &str, game_type: &str, scoring: &str) -> Value {
    let (status, game) = common::post_json(
        &app.router,
        "/api/v1/games",
        Some(gm),
        &json!({ "quiz_id": quiz_id, "game_type": game_type, "scoring_type": scoring }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    game
}

async fn answer(app: &common::TestApp, user: &str, game: &Value, text: &str) -> (StatusCode, Value) {
    common::post_json(
        &app.router,
        &format!("/api/v1/games/{}/answers", game["game_id"].as_str().unwrap()),
        Some(user),
        &json!({ "question_id": game["question_id"], "answer": { "text": text } }),
    )
    .await
}

#[tokio::test]
async fn test_solo_game_runs_to_completion() {
    // Arrange
    let app = common::build_test_app();
    let quiz_id = common::publish_single_answer_quiz(
        &app.router,
        "Capitals",
        &[("Capital of Peru?", "Lima"), ("Capital of Chile?", "Santiago")],
    )
    .await;
    let game = start_game(&app, "solo", &quiz_id, "solo", "all").await;
    assert_eq!(game["questions_total"], 2);
    let answers = [("Capital of Peru?", "Lima"), ("Capital of Chile?", "Santiago")];
    let correct_for = |question: &Value| {
        answers
            .iter()
            .find(|(text, _)| question["question_text"] == *text)
            .map(|(_, answer)| *answer)
            .unwrap()
    };

    // Act: right answer, then wrong answer.
    let (status, first) = answer(&app, "solo", &game, correct_for(&game)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["correct"], true);
    assert_eq!(first["session"]["status"], "in_progress");
    assert_eq!(first["session"]["question_number"], 2);

    let (status, second) = answer(&app, "solo", &first["session"], "Atlantis").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["correct"], false);
    assert_eq!(second["session"]["status"], "completed");
    assert_eq!(second["session"]["scores"], json!([{ "username": "solo", "points": 1 }]));

    let (status, _) = common::get_json(
        &app.router,
        &format!("/api/v1/games/{}", game["game_id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let hard_work: Vec<_> = app
        .achievements
        .granted()
        .into_iter()
        .filter(|(achievement, _)| *achievement == Achievement::HardWorker)
        .collect();
    assert_eq!(hard_work, vec![(Achievement::HardWorker, "solo-id".to_owned())]);
}

#[tokio::test]
async fn test_party_game_scores_first_answer_bonus_and_picks_winner() {
    // Arrange
    let app = common::build_test_app();
    let quiz_id =
        common::publish_single_answer_quiz(&app.router, "Capitals", &[("Capital of Peru?", "Lima")])
            .await;
    let game = start_game(&app, "gm", &quiz_id, "party", "first").await;
    let game_id = game["game_id"].as_str().unwrap().to_owned();

    // Act
    let (_, a) = answer(&app, "userA", &game, "Lima").await;
    let (_, b) = answer(&app, "userB", &game, "Lima").await;
    let (_, c) = answer(&app, "userC", &game, "Quito").await;

    // Assert
    assert_eq!(a["points_awarded"], 3);
    assert_eq!(b["points_awarded"], 1);
    assert_eq!(c["points_awarded"], 0);
    assert_eq!(c["session"]["right_answerers"], json!(["userA", "userB"]));
    assert_eq!(c["session"]["already_answered"], json!(["userA", "userB", "userC"]));

    let (_, board) = common::get_json(&app.router, &format!("/api/v1/games/{game_id}/scoreboard")).await;
    assert_eq!(board["rows"][0], json!({ "username": "userA", "points": 3 }));

    let (status, done) = common::post_json(
        &app.router,
        &format!("/api/v1/games/{game_id}/next"),
        Some("gm"),
        &json!({ "question_id": game["question_id"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert_eq!(done["winner"], "userA");
    assert!(
        app.achievements
            .granted()
            .contains(&(Achievement::Winner, "userA-id".to_owned()))
    );
}

#[tokio::test]
async fn test_answer_to_passed_question_is_stale() {
    let app = common::build_test_app();
    let quiz_id = common::publish_single_answer_quiz(
        &app.router,
        "Capitals",
        &[("Capital of Peru?", "Lima"), ("Capital of Chile?", "Santiago")],
    )
    .await;
    let game = start_game(&app, "gm", &quiz_id, "party", "all").await;
    common::post_json(
        &app.router,
        &format!("/api/v1/games/{}/next", game["game_id"].as_str().unwrap()),
        Some("gm"),
        &json!({ "question_id": game["question_id"] }),
    )
    .await;

    let (status, json) = answer(&app, "late", &game, "Lima").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "stale_question");
}

#[tokio::test]
async fn test_answer_without_user_returns_401() {
    let app = common::build_test_app();
    let quiz_id =
        common::publish_single_answer_quiz(&app.router, "Capitals", &[("Capital of Peru?", "Lima")])
            .await;
    let game = start_game(&app, "gm", &quiz_id, "party", "all").await;

    let (status, json) = common::post_json(
        &app.router,
        &format!("/api/v1/games/{}/answers", game["game_id"].as_str().unwrap()),
        None,
        &json!({ "question_id": game["question_id"], "answer": { "text": "Lima" } }),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "unauthenticated");
}

#[tokio::test]
async fn test_attach_post_updates_current_post() {
    let app = common::build_test_app();
    let quiz_id =
        common::publish_single_answer_quiz(&app.router, "Capitals", &[("Capital of Peru?", "Lima")])
            .await;
    let game = start_game(&app, "gm", &quiz_id, "party", "all").await;

    let (status, json) = common::put_json(
        &app.router,
        &format!("/api/v1/games/{}/post", game["game_id"].as_str().unwrap()),
        &json!({ "post_id": "post-42" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_post_id"], "post-42");
}
