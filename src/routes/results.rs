use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::dto::store_dto::CreateResultPayload;
use crate::error::Result;
use crate::models::stored_result::StoredResult;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/users/{id}/results",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Results of the user", body = Vec<StoredResult>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn list_results(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<StoredResult>>> {
    Ok(Json(state.store.list_results(user_id)?))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/results",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = CreateResultPayload,
    responses(
        (status = 201, description = "Result saved", body = Json<StoredResult>),
        (status = 400, description = "Invalid payload"),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn create_result(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<CreateResultPayload>,
) -> Result<(StatusCode, Json<StoredResult>)> {
    payload.validate()?;
    let result = state.store.create_result(user_id, &payload)?;
    tracing::info!(user_id, result_id = result.id, score = result.score, "result saved");
    Ok((StatusCode::CREATED, Json(result)))
}

#[utoipa::path(
    get,
    path = "/api/results/{id}",
    params(
        ("id" = i64, Path, description = "Result ID")
    ),
    responses(
        (status = 200, description = "Saved result", body = Json<StoredResult>),
        (status = 404, description = "Result not found")
    )
)]
#[axum::debug_handler]
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StoredResult>> {
    Ok(Json(state.store.get_result(id)?))
}
