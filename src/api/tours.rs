//! Tour catalog handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;

use super::PageParams;
use super::error::{ApiError, ValidatedJson};
use crate::auth::Claims;
use crate::domain::{
    AdditionalServiceInput, DomainError, PageRequest, Tour, TourAttributeKind, TourInput,
    TourSort,
};
use crate::infrastructure::AppState;

const TOP_RATED_LIMIT: u64 = 5;

async fn load_tour(state: &AppState, id: i32) -> Result<Tour, ApiError> {
    state
        .tour_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found("Tour", id).into())
}

#[utoipa::path(
    get,
    path = "/api/tours",
    params(
        ("page" = Option<u64>, Query, description = "Zero-based page"),
        ("size" = Option<u64>, Query, description = "Page size"),
        ("sortBy" = Option<String>, Query, description = "id, title, price, rating or duration")
    ),
    responses((status = 200, description = "Page of tours"))
)]
pub async fn list_tours(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    let sort = params
        .sort_by
        .as_deref()
        .map(str::parse::<TourSort>)
        .transpose()?
        .unwrap_or_default();
    Ok(Json(
        state
            .tour_repo
            .find_page(params.page_request(), sort)
            .await?,
    ))
}

pub async fn get_tour(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(load_tour(&state, id).await?))
}

pub async fn featured_tours(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state.tour_repo.find_featured(params.page_request()).await?,
    ))
}

pub async fn tours_by_category(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .tour_repo
            .find_by_category(&name, params.page_request())
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

pub async fn search_tours(
    State(state): State<AppState>,
    Query(q): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        state
            .tour_repo
            .search(&q.query, PageRequest::new(q.page, q.size))
            .await?,
    ))
}

pub async fn top_rated_tours(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.tour_repo.find_top_rated(TOP_RATED_LIMIT).await?))
}

async fn tour_attribute(
    state: &AppState,
    id: i32,
    kind: TourAttributeKind,
) -> Result<Json<Vec<String>>, ApiError> {
    let tour = load_tour(state, id).await?;
    Ok(Json(tour.attribute(kind).to_vec()))
}

pub async fn tour_highlights(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    tour_attribute(&state, id, TourAttributeKind::Highlight).await
}

pub async fn tour_included_services(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    tour_attribute(&state, id, TourAttributeKind::IncludedService).await
}

pub async fn tour_excluded_services(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    tour_attribute(&state, id, TourAttributeKind::ExcludedService).await
}

pub async fn tour_pickup_points(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    tour_attribute(&state, id, TourAttributeKind::PickupPoint).await
}

pub async fn tour_additional_services(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.service_repo.find_by_tour(id).await?))
}

pub async fn create_tour(
    claims: Claims,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<TourInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let tour = state.tour_repo.create(payload).await?;
    Ok((StatusCode::CREATED, Json(tour)))
}

pub async fn update_tour(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<TourInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(state.tour_repo.update(id, payload).await?))
}

pub async fn delete_tour(
    claims: Claims,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    state.tour_repo.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a catalog service and link it to the tour
pub async fn create_tour_service(
    claims: Claims,
    State(state): State<AppState>,
    Path(tour_id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<AdditionalServiceInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    load_tour(&state, tour_id).await?;

    let service = state.service_repo.create(payload).await?;
    state.tour_repo.link_service(tour_id, service.id).await?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub async fn link_tour_service(
    claims: Claims,
    State(state): State<AppState>,
    Path((tour_id, service_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    state.tour_repo.link_service(tour_id, service_id).await?;
    Ok(Json(state.service_repo.find_by_tour(tour_id).await?))
}

pub async fn update_tour_service(
    claims: Claims,
    State(state): State<AppState>,
    Path((tour_id, service_id)): Path<(i32, i32)>,
    ValidatedJson(payload): ValidatedJson<AdditionalServiceInput>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    if !state
        .tour_repo
        .is_service_linked(tour_id, service_id)
        .await?
    {
        return Err(DomainError::NotFound {
            entity: "TourAdditionalService",
            id: format!("{}/{}", tour_id, service_id),
        }
        .into());
    }
    Ok(Json(state.service_repo.update(service_id, payload).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlinkQuery {
    #[serde(default)]
    pub delete_service: bool,
}

/// Unlink a service; with `deleteService=true` the service itself is removed
/// once no tour links it any more.
pub async fn unlink_tour_service(
    claims: Claims,
    State(state): State<AppState>,
    Path((tour_id, service_id)): Path<(i32, i32)>,
    Query(query): Query<UnlinkQuery>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let remaining = state.tour_repo.unlink_service(tour_id, service_id).await?;

    if query.delete_service {
        if remaining == 0 {
            state.service_repo.delete(service_id).await?;
            tracing::info!("Deleted additional service {} after unlinking", service_id);
        } else {
            tracing::info!(
                "Kept additional service {}: still linked to {} tour(s)",
                service_id,
                remaining
            );
        }
    }
    Ok(StatusCode::NO_CONTENT)
}
