pub mod health;
pub mod progress;
pub mod quiz;
pub mod results;
pub mod sessions;
pub mod subjects;
pub mod test_records;
pub mod trophies;
pub mod users;

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(app_state: AppState) -> Router {
    let base_routes = Router::new().route("/health", get(health::health));

    let quiz_api = Router::new()
        .route("/api/quiz/generate", post(quiz::generate_test))
        .route("/api/quiz/score", post(quiz::score_test))
        .route(
            "/api/quiz/subjects/:slug/chapters",
            get(quiz::list_chapters),
        );

    let session_api = Router::new()
        .route("/api/sessions", post(sessions::create_session))
        .route(
            "/api/sessions/:id",
            get(sessions::get_session).delete(sessions::delete_session),
        )
        .route("/api/sessions/:id/start", post(sessions::start))
        .route("/api/sessions/:id/answer", post(sessions::select_option))
        .route("/api/sessions/:id/next", post(sessions::next))
        .route("/api/sessions/:id/previous", post(sessions::previous))
        .route("/api/sessions/:id/submit", post(sessions::submit))
        .route("/api/sessions/:id/review", post(sessions::review))
        .route("/api/sessions/:id/results", post(sessions::back_to_results))
        .route("/api/sessions/:id/take-again", post(sessions::take_again))
        .route("/api/sessions/:id/chapter", post(sessions::choose_chapter))
        .route(
            "/api/sessions/:id/difficulty",
            post(sessions::set_difficulty),
        );

    let store_api = Router::new()
        .route("/api/users", post(users::create_user))
        .route("/api/users/:id", get(users::get_user))
        .route(
            "/api/users/:id/progress",
            get(progress::list_progress).post(progress::upsert_progress),
        )
        .route(
            "/api/users/:id/subjects/:subject_id/progress",
            get(progress::get_progress),
        )
        .route(
            "/api/users/:id/results",
            get(results::list_results).post(results::create_result),
        )
        .route("/api/results/:id", get(results::get_result))
        .route(
            "/api/users/:id/trophies",
            get(trophies::list_user_trophies).post(trophies::create_user_trophy),
        )
        .route(
            "/api/users/:id/trophies/:trophy_id",
            patch(trophies::update_user_trophy),
        )
        .route(
            "/api/subjects",
            get(subjects::list_subjects).post(subjects::create_subject),
        )
        .route("/api/subjects/:id", get(subjects::get_subject))
        .route(
            "/api/subjects/:id/tests",
            get(test_records::list_tests).post(test_records::create_test),
        )
        .route("/api/tests/:id", get(test_records::get_test))
        .route(
            "/api/trophies",
            get(trophies::list_trophies).post(trophies::create_trophy),
        )
        .route("/api/trophies/:id", get(trophies::get_trophy));

    base_routes
        .merge(quiz_api)
        .merge(session_api)
        .merge(store_api)
        .with_state(app_state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
