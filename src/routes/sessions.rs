use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::dto::session_dto::{
    ChooseChapterRequest, CreateSessionRequest, SelectOptionRequest, SessionResponse,
    SetDifficultyRequest,
};
use crate::error::Result;
use crate::AppState;

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created in the intro state", body = Json<SessionResponse>),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    payload.validate()?;
    let session = state.session_service.create(
        &payload.subject_id,
        payload.difficulty,
        payload.chapter_id.clone(),
        payload.preferences(),
    )?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Current session view", body = Json<SessionResponse>),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.get(id)?.into()))
}

#[utoipa::path(
    delete,
    path = "/api/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 204, description = "Session removed and its countdown stopped"),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state.session_service.remove(id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/start",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Test started", body = Json<SessionResponse>),
        (status = 409, description = "Session is not in the intro state")
    )
)]
#[axum::debug_handler]
pub async fn start(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.start(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/answer",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = SelectOptionRequest,
    responses(
        (status = 200, description = "Answer recorded for the current question", body = Json<SessionResponse>),
        (status = 400, description = "Option out of range"),
        (status = 409, description = "Session is not in progress")
    )
)]
#[axum::debug_handler]
pub async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SelectOptionRequest>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(
        state.session_service.select_option(id, payload.option)?.into(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/next",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Moved forward, or submitted on the last question", body = Json<SessionResponse>),
        (status = 409, description = "Session is not in progress")
    )
)]
#[axum::debug_handler]
pub async fn next(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.next(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/previous",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Moved back one question", body = Json<SessionResponse>),
        (status = 409, description = "Session is not in progress")
    )
)]
#[axum::debug_handler]
pub async fn previous(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.previous(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/submit",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Test scored", body = Json<SessionResponse>),
        (status = 409, description = "Session is not in progress")
    )
)]
#[axum::debug_handler]
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.submit(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/review",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Answer review opened", body = Json<SessionResponse>),
        (status = 409, description = "Session is not completed")
    )
)]
#[axum::debug_handler]
pub async fn review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.review(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/results",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Back on the results screen", body = Json<SessionResponse>),
        (status = 409, description = "Session is not in review")
    )
)]
#[axum::debug_handler]
pub async fn back_to_results(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.back_to_results(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/take-again",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "New test at the adapted difficulty", body = Json<SessionResponse>),
        (status = 409, description = "Session is not finished")
    )
)]
#[axum::debug_handler]
pub async fn take_again(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(state.session_service.take_again(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/chapter",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = ChooseChapterRequest,
    responses(
        (status = 200, description = "New test for the chosen chapter", body = Json<SessionResponse>),
        (status = 409, description = "Session is in progress")
    )
)]
#[axum::debug_handler]
pub async fn choose_chapter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ChooseChapterRequest>,
) -> Result<Json<SessionResponse>> {
    payload.validate()?;
    Ok(Json(
        state
            .session_service
            .choose_chapter(id, payload.chapter_id)?
            .into(),
    ))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/difficulty",
    params(
        ("id" = Uuid, Path, description = "Session ID")
    ),
    request_body = SetDifficultyRequest,
    responses(
        (status = 200, description = "Test regenerated at the chosen difficulty", body = Json<SessionResponse>),
        (status = 409, description = "Session is not in the intro state")
    )
)]
#[axum::debug_handler]
pub async fn set_difficulty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetDifficultyRequest>,
) -> Result<Json<SessionResponse>> {
    Ok(Json(
        state
            .session_service
            .set_difficulty(id, payload.difficulty)?
            .into(),
    ))
}
