use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::dto::store_dto::{CreateTrophyPayload, CreateUserTrophyPayload, UpdateUserTrophyPayload};
use crate::error::Result;
use crate::models::trophy::{Trophy, UserTrophy};
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/trophies",
    responses(
        (status = 200, description = "All trophies", body = Vec<Trophy>)
    )
)]
#[axum::debug_handler]
pub async fn list_trophies(State(state): State<AppState>) -> Result<Json<Vec<Trophy>>> {
    Ok(Json(state.store.list_trophies()?))
}

#[utoipa::path(
    post,
    path = "/api/trophies",
    request_body = CreateTrophyPayload,
    responses(
        (status = 201, description = "Trophy created", body = Json<Trophy>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_trophy(
    State(state): State<AppState>,
    Json(payload): Json<CreateTrophyPayload>,
) -> Result<(StatusCode, Json<Trophy>)> {
    payload.validate()?;
    let trophy = state.store.create_trophy(&payload)?;
    Ok((StatusCode::CREATED, Json(trophy)))
}

#[utoipa::path(
    get,
    path = "/api/trophies/{id}",
    params(
        ("id" = i64, Path, description = "Trophy ID")
    ),
    responses(
        (status = 200, description = "Trophy", body = Json<Trophy>),
        (status = 404, description = "Trophy not found")
    )
)]
#[axum::debug_handler]
pub async fn get_trophy(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Trophy>> {
    Ok(Json(state.store.get_trophy(id)?))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/trophies",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Trophies of the user", body = Vec<UserTrophy>),
        (status = 404, description = "User not found")
    )
)]
#[axum::debug_handler]
pub async fn list_user_trophies(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<UserTrophy>>> {
    Ok(Json(state.store.list_user_trophies(user_id)?))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/trophies",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = CreateUserTrophyPayload,
    responses(
        (status = 201, description = "Trophy assigned", body = Json<UserTrophy>),
        (status = 404, description = "User or trophy not found"),
        (status = 409, description = "Trophy already assigned")
    )
)]
#[axum::debug_handler]
pub async fn create_user_trophy(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<CreateUserTrophyPayload>,
) -> Result<(StatusCode, Json<UserTrophy>)> {
    payload.validate()?;
    let row = state.store.create_user_trophy(user_id, &payload)?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/trophies/{trophy_id}",
    params(
        ("id" = i64, Path, description = "User ID"),
        ("trophy_id" = i64, Path, description = "Trophy ID")
    ),
    request_body = UpdateUserTrophyPayload,
    responses(
        (status = 200, description = "Trophy status updated", body = Json<UserTrophy>),
        (status = 404, description = "User has no such trophy")
    )
)]
#[axum::debug_handler]
pub async fn update_user_trophy(
    State(state): State<AppState>,
    Path((user_id, trophy_id)): Path<(i64, i64)>,
    Json(payload): Json<UpdateUserTrophyPayload>,
) -> Result<Json<UserTrophy>> {
    Ok(Json(state.store.update_user_trophy_status(
        user_id,
        trophy_id,
        payload.status,
    )?))
}
