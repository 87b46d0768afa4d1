use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use super::error::{ApiError, ValidatedJson};
use crate::auth::Claims;
use crate::domain::{DomainError, TourPricingInput};
use crate::infrastructure::AppState;

pub async fn list_tour_pricing(
    State(state): State<AppState>,
    Path(tour_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.pricing_repo.find_by_tour(tour_id).await?))
}

pub async fn list_tour_pricing_by_trip(
    State(state): State<AppState>,
    Path((tour_id, round_trip)): Path<(i32, bool)>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .pricing_repo
            .find_by_tour_and_round_trip(tour_id, round_trip)
            .await?,
    ))
}

pub async fn get_pricing(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let pricing = state
        .pricing_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("TourPricing", id))?;
    Ok(Json(pricing))
}

pub async fn create_pricing(
    claims: Claims,
    State(state): State<AppState>,
    Path(tour_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<TourPricingInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let pricing = state.pricing_repo.create(tour_id, payload).await?;
    Ok((StatusCode::CREATED, Json(pricing)))
}

pub async fn update_pricing(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<TourPricingInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(state.pricing_repo.update(id, payload).await?))
}

pub async fn delete_pricing(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    state.pricing_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
