use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::error::{ApiError, ValidatedJson};
use crate::auth::Claims;
use crate::domain::{AdditionalServiceInput, DomainError};
use crate::infrastructure::AppState;

pub async fn list_services(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service_repo.find_all().await?))
}

pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let service = state
        .service_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("AdditionalService", id))?;
    Ok(Json(service))
}

pub async fn create_service(
    claims: Claims,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AdditionalServiceInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let service = state.service_repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn update_service(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AdditionalServiceInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(state.service_repo.update(id, payload).await?))
}

pub async fn delete_service(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    state.service_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
