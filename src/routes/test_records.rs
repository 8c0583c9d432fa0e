use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::dto::store_dto::CreateTestRecordPayload;
use crate::error::Result;
use crate::models::test_record::TestRecord;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/subjects/{id}/tests",
    params(
        ("id" = i64, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Saved tests of the subject", body = Vec<TestRecord>),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn list_tests(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
) -> Result<Json<Vec<TestRecord>>> {
    Ok(Json(state.store.list_tests_by_subject(subject_id)?))
}

#[utoipa::path(
    post,
    path = "/api/subjects/{id}/tests",
    params(
        ("id" = i64, Path, description = "Subject ID")
    ),
    request_body = CreateTestRecordPayload,
    responses(
        (status = 201, description = "Test saved", body = Json<TestRecord>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn create_test(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
    Json(payload): Json<CreateTestRecordPayload>,
) -> Result<(StatusCode, Json<TestRecord>)> {
    payload.validate()?;
    let record = state.store.create_test(subject_id, &payload)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/tests/{id}",
    params(
        ("id" = i64, Path, description = "Test ID")
    ),
    responses(
        (status = 200, description = "Saved test", body = Json<TestRecord>),
        (status = 404, description = "Test not found")
    )
)]
#[axum::debug_handler]
pub async fn get_test(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TestRecord>> {
    Ok(Json(state.store.get_test(id)?))
}
