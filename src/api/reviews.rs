use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::error::{ApiError, ValidatedJson};
use crate::auth::Claims;
use crate::domain::{DomainError, TourReviewInput};
use crate::infrastructure::AppState;

pub async fn list_tour_reviews(
    State(state): State<AppState>,
    Path(tour_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.review_repo.find_by_tour(tour_id).await?))
}

pub async fn list_tour_reviews_by_platform(
    State(state): State<AppState>,
    Path((tour_id, platform)): Path<(i32, String)>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .review_repo
            .find_by_tour_and_platform(tour_id, &platform)
            .await?,
    ))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let review = state
        .review_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("TourReview", id))?;
    Ok(Json(review))
}

pub async fn count_tour_reviews(
    State(state): State<AppState>,
    Path(tour_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.review_repo.count_by_tour(tour_id).await?))
}

pub async fn create_review(
    claims: Claims,
    State(state): State<AppState>,
    Path(tour_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<TourReviewInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let review = state.review_repo.create(tour_id, payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub async fn update_review(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<TourReviewInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(state.review_repo.update(id, payload).await?))
}

pub async fn delete_review(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    state.review_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
