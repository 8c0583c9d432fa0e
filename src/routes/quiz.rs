use axum::{
    extract::{Path, State},
    response::Json,
};
use validator::Validate;

use crate::dto::quiz_dto::{
    ChapterListResponse, GenerateTestRequest, ScoreTestRequest, ScoreTestResponse,
};
use crate::error::Result;
use crate::models::test::Test;
use crate::services::scoring_service::ScoringService;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/quiz/generate",
    request_body = GenerateTestRequest,
    responses(
        (status = 200, description = "Generated test", body = Json<Test>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn generate_test(
    State(state): State<AppState>,
    Json(payload): Json<GenerateTestRequest>,
) -> Result<Json<Test>> {
    payload.validate()?;
    let test = state.generator_service.generate_test(
        &payload.subject_id,
        payload.difficulty,
        payload.chapter_id.as_deref(),
    );
    Ok(Json(test))
}

#[utoipa::path(
    post,
    path = "/api/quiz/score",
    request_body = ScoreTestRequest,
    responses(
        (status = 200, description = "Scored result with the recommended next difficulty", body = Json<ScoreTestResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn score_test(
    State(state): State<AppState>,
    Json(payload): Json<ScoreTestRequest>,
) -> Result<Json<ScoreTestResponse>> {
    let result = state
        .scoring_service
        .score_test(&payload.test, &payload.answers);
    let next = ScoringService::next_difficulty(&result);
    tracing::info!(
        test_id = %result.test_id,
        score = result.score,
        next_difficulty = %next,
        "scored test"
    );
    Ok(Json(ScoreTestResponse::new(result, next)))
}

#[utoipa::path(
    get,
    path = "/api/quiz/subjects/{slug}/chapters",
    params(
        ("slug" = String, Path, description = "Subject slug, e.g. math")
    ),
    responses(
        (status = 200, description = "Chapters of the subject", body = Json<ChapterListResponse>)
    )
)]
#[axum::debug_handler]
pub async fn list_chapters(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ChapterListResponse>> {
    let chapters = state.catalog.chapters_for(&slug).to_vec();
    Ok(Json(ChapterListResponse {
        subject_id: slug,
        chapters,
    }))
}
