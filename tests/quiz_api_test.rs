use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn app() -> Router {
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("SEED_CATALOG", "true");
    let config = ncert_quiz_backend::config::Config::from_env().expect("config");
    let state = ncert_quiz_backend::AppState::new(&config).expect("app state");
    ncert_quiz_backend::routes::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn generate_then_score_round_trip() {
    let app = app();
    let (status, test) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "subject_id": "math", "difficulty": "intermediate", "chapter_id": "3" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(test["title"], "Mathematics Intermediate Test");
    assert_eq!(test["chapter"], "Chapter 3: Playing with Numbers");
    assert_eq!(test["duration"], 300);
    assert_eq!(test["generated_by"], "ai");
    assert!(test["id"].as_str().unwrap().starts_with("math-test-"));

    let questions = test["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 10);

    let answers: Vec<JsonValue> = questions
        .iter()
        .map(|q| json!({ "question_id": q["id"], "selected_option": q["correct_answer"] }))
        .collect();
    let (status, scored) = send(
        &app,
        "POST",
        "/api/quiz/score",
        Some(json!({ "test": test, "answers": answers })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scored["result"]["score"], 100);
    assert_eq!(scored["result"]["correct_answers"], 10);
    assert_eq!(scored["next_difficulty"], "hard");
    assert_eq!(scored["feedback"], "excellent");
}

#[tokio::test]
async fn unanswered_test_scores_zero_and_steps_down() {
    let app = app();
    let (_, test) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "subject_id": "science", "difficulty": "medium" })),
    )
    .await;
    let (status, scored) = send(
        &app,
        "POST",
        "/api/quiz/score",
        Some(json!({ "test": test, "answers": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(scored["result"]["score"], 0);
    assert_eq!(scored["result"]["unattempted"], 10);
    assert_eq!(scored["next_difficulty"], "easy");
    assert_eq!(scored["feedback"], "keep_practicing");
}

#[tokio::test]
async fn unknown_subject_uses_default_bank() {
    let app = app();
    let (status, test) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "subject_id": "astronomy", "difficulty": "easy" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(test["title"], "Science Easy Test");
    assert_eq!(test["questions"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn rejects_bad_generate_payloads() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "subject_id": "", "difficulty": "easy" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        "POST",
        "/api/quiz/generate",
        Some(json!({ "subject_id": "math", "difficulty": "impossible" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn lists_subject_chapters() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/quiz/subjects/math/chapters", None).await;
    assert_eq!(status, StatusCode::OK);
    let chapters = body["chapters"].as_array().unwrap();
    assert_eq!(chapters.len(), 14);
    assert_eq!(chapters[0], "Chapter 1: Knowing Our Numbers");
}
