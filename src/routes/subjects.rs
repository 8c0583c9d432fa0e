use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use validator::Validate;

use crate::dto::store_dto::CreateSubjectPayload;
use crate::error::Result;
use crate::models::subject::Subject;
use crate::AppState;

#[utoipa::path(
    get,
    path = "/api/subjects",
    responses(
        (status = 200, description = "All subjects", body = Vec<Subject>)
    )
)]
#[axum::debug_handler]
pub async fn list_subjects(State(state): State<AppState>) -> Result<Json<Vec<Subject>>> {
    Ok(Json(state.store.list_subjects()?))
}

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubjectPayload,
    responses(
        (status = 201, description = "Subject created", body = Json<Subject>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectPayload>,
) -> Result<(StatusCode, Json<Subject>)> {
    payload.validate()?;
    let subject = state.store.create_subject(&payload)?;
    Ok((StatusCode::CREATED, Json(subject)))
}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(
        ("id" = i64, Path, description = "Subject ID")
    ),
    responses(
        (status = 200, description = "Subject", body = Json<Subject>),
        (status = 404, description = "Subject not found")
    )
)]
#[axum::debug_handler]
pub async fn get_subject(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Subject>> {
    Ok(Json(state.store.get_subject(id)?))
}
