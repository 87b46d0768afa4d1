use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;

use super::PageParams;
use super::error::ApiError;
use crate::auth::Claims;
use crate::services::user_service;

pub async fn list_users(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(
        user_service::list_users(&db, params.page_request()).await?,
    ))
}

pub async fn get_user(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(user_service::get_user(&db, &claims, id).await?))
}

pub async fn get_profile(
    claims: Claims,
    State(db): State<DatabaseConnection>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(user_service::profile(&db, &claims).await?))
}
