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

async fn create_user(app: &Router, username: &str) -> i64 {
    let (status, user) = send(
        app,
        "POST",
        "/api/users",
        Some(json!({ "username": username, "password": "pa55word", "display_name": "Asha" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(user.get("password").is_none());
    user["id"].as_i64().unwrap()
}

#[tokio::test]
async fn users_are_unique_by_username() {
    let app = app();
    let id = create_user(&app, "asha").await;

    let (status, user) = send(&app, "GET", &format!("/api/users/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "asha");

    let (status, _) = send(
        &app,
        "POST",
        "/api/users",
        Some(json!({ "username": "asha", "password": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/users/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn seeded_subjects_and_saved_tests() {
    let app = app();
    let (status, subjects) = send(&app, "GET", "/api/subjects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(subjects.as_array().unwrap().len(), 6);

    let (status, subject) = send(
        &app,
        "POST",
        "/api/subjects",
        Some(json!({
            "name": "Computer Science",
            "description": "Basics of computing",
            "icon": "fa-laptop",
            "color": "#3366ff",
            "background_color": "#eef2ff",
            "icon_background_color": "#c7d2fe"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let subject_id = subject["id"].as_i64().unwrap();
    assert_eq!(subject_id, 7);

    let (status, saved) = send(
        &app,
        "POST",
        &format!("/api/subjects/{}/tests", subject_id),
        Some(json!({
            "title": "Computer Science Easy Test",
            "chapter": "Chapter 1: What is a Computer?",
            "icon": "fa-laptop",
            "difficulty": "easy",
            "duration": 300,
            "questions": [{
                "id": "cs-1",
                "text": "Which device is used to type text?",
                "options": ["Keyboard", "Monitor", "Speaker", "Printer"],
                "correct_answer": 0,
                "difficulty": "easy"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved["generated_by"], "system");

    let test_id = saved["id"].as_i64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/api/tests/{}", test_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["questions"].as_array().unwrap().len(), 1);

    let (_, listed) = send(&app, "GET", &format!("/api/subjects/{}/tests", subject_id), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/subjects/999/tests",
        Some(json!({
            "title": "Nowhere", "chapter": "", "icon": "", "difficulty": "easy",
            "duration": 300, "questions": []
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_upserts_in_place() {
    let app = app();
    let user_id = create_user(&app, "ravi").await;

    let (status, first) = send(
        &app,
        "POST",
        &format!("/api/users/{}/progress", user_id),
        Some(json!({ "subject_id": 1, "progress": 40, "rating": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(
        &app,
        "POST",
        &format!("/api/users/{}/progress", user_id),
        Some(json!({ "subject_id": 1, "progress": 75, "rating": 4 })),
    )
    .await;
    assert_eq!(first["id"], second["id"]);

    let (_, one) = send(
        &app,
        "GET",
        &format!("/api/users/{}/subjects/1/progress", user_id),
        None,
    )
    .await;
    assert_eq!(one["progress"], 75);
    assert_eq!(one["rating"], 4);

    let (_, all) = send(&app, "GET", &format!("/api/users/{}/progress", user_id), None).await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/users/{}/progress", user_id),
        Some(json!({ "subject_id": 1, "progress": 140, "rating": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn results_are_validated_and_listed() {
    let app = app();
    let user_id = create_user(&app, "meera").await;

    let (status, saved) = send(
        &app,
        "POST",
        &format!("/api/users/{}/results", user_id),
        Some(json!({
            "test_id": "science-test-1700000000000",
            "total_questions": 10,
            "correct_answers": 7,
            "incorrect_answers": 2,
            "unattempted": 1,
            "score": 70,
            "user_answers": [{ "question_id": "q1", "selected_option": 2 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let result_id = saved["id"].as_i64().unwrap();

    let (_, fetched) = send(&app, "GET", &format!("/api/results/{}", result_id), None).await;
    assert_eq!(fetched["score"], 70);
    let (_, listed) = send(&app, "GET", &format!("/api/users/{}/results", user_id), None).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/users/{}/results", user_id),
        Some(json!({
            "test_id": "science-test-1",
            "total_questions": 10,
            "correct_answers": 7,
            "incorrect_answers": 7,
            "unattempted": 1,
            "score": 70
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/users/{}/results", user_id),
        Some(json!({
            "test_id": "science-test-2",
            "total_questions": 0,
            "correct_answers": u32::MAX,
            "incorrect_answers": 1,
            "unattempted": 0,
            "score": 0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn trophies_unlock_once() {
    let app = app();
    let user_id = create_user(&app, "kabir").await;

    let (_, trophies) = send(&app, "GET", "/api/trophies", None).await;
    assert_eq!(trophies.as_array().unwrap().len(), 4);
    let (status, trophy) = send(&app, "GET", "/api/trophies/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(trophy["name"].is_string());

    let (status, assigned) = send(
        &app,
        "POST",
        &format!("/api/users/{}/trophies", user_id),
        Some(json!({ "trophy_id": 1, "status": "in-progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(assigned["earned_at"].is_null());

    let (status, unlocked) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}/trophies/1", user_id),
        Some(json!({ "status": "unlocked" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let earned_at = unlocked["earned_at"].clone();
    assert!(earned_at.is_string());

    let (_, relocked) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}/trophies/1", user_id),
        Some(json!({ "status": "unlocked" })),
    )
    .await;
    assert_eq!(relocked["earned_at"], earned_at);

    let (_, mine) = send(&app, "GET", &format!("/api/users/{}/trophies", user_id), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/users/{}/trophies/3", user_id),
        Some(json!({ "status": "unlocked" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
