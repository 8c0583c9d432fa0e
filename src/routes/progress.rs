use axum::{
    extract::{Path, State},
    response::Json,
};
use validator::Validate;

use crate::dto::store_dto::UpsertProgressPayload;
use crate::error::Result;
use crate::models::progress::UserProgress;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/users/{id}/progress",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Progress across subjects", body = Vec<UserProgress>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn list_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserProgress>>> {
    Ok(Json(state.store.list_progress(user_id)?))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/progress",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UpsertProgressPayload,
    responses(
        (status = 200, description = "Progress created or updated", body = Json<UserProgress>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User or subject not found")
    )
)]
#[axum::debug_handler]
pub async fn upsert_progress(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpsertProgressPayload>,
) -> Result<Json<UserProgress>> {
    payload.validate()?;
    Ok(Json(state.store.upsert_progress(user_id, &payload)?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/subjects/{subject_id}/progress",
    params(
        ("id" = i64, Path, description = "User ID"),
        ("subject_id" = i64, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Progress in one subject", body = Json<UserProgress>),
        (status = 404, description = "No progress recorded")
    )
)]
#[axum::debug_handler]
pub async fn get_progress(
    State(state): State<AppState>,
    Path((user_id, subject_id)): Path<(i64, i64)>,
) -> Result<Json<UserProgress>> {
    Ok(Json(state.store.get_progress(user_id, subject_id)?))
}
