use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::PageParams;
use super::error::{ApiError, ValidatedJson};
use crate::auth::Claims;
use crate::domain::{CategoryInput, DomainError};
use crate::infrastructure::AppState;

pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.category_repo.find_page(params.page_request()).await?,
    ))
}

pub async fn all_categories(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.category_repo.find_all().await?))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .category_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", id))?;
    Ok(Json(category))
}

pub async fn get_category_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state
        .category_repo
        .find_by_name(&name)
        .await?
        .ok_or_else(|| DomainError::not_found("Category", &name))?;
    Ok(Json(category))
}

pub async fn create_category(
    claims: Claims,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let category = state.category_repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<CategoryInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(state.category_repo.update(id, payload).await?))
}

pub async fn delete_category(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    state.category_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
