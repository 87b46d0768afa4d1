//! Booking and reporting handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use validator::Validate;

use super::PageParams;
use super::error::{ApiError, ValidatedJson};
use crate::auth::Claims;
use crate::domain::{
    BookingStatus, CreateBookingInput, PageRequest, PricingSelection, ServiceSelection,
};
use crate::services::{booking_service, report_service};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PricingOptionRequest {
    pub pricing_option_id: i32,
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalServiceRequest {
    #[validate(length(min = 1, message = "serviceName is required"))]
    pub service_name: String,
    pub service_type: Option<String>,
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "quantity must be at least 1"))]
    pub quantity: i32,
    pub additional_service_id: Option<i32>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub tour_id: i32,
    pub departure_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[validate(length(min = 1, message = "customerName is required"))]
    pub customer_name: String,
    #[validate(email(message = "customerEmail must be a valid email"))]
    pub customer_email: String,
    pub pickup_location: Option<String>,
    pub pickup_address: Option<String>,
    pub whatsapp_number: Option<String>,
    pub note_for_meetup: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub pricing_options: Vec<PricingOptionRequest>,
    #[serde(default)]
    #[validate(nested)]
    pub additional_services: Vec<AdditionalServiceRequest>,
}

impl From<CreateBookingRequest> for CreateBookingInput {
    fn from(req: CreateBookingRequest) -> Self {
        CreateBookingInput {
            tour_id: req.tour_id,
            departure_date: req.departure_date,
            end_date: req.end_date,
            customer_name: req.customer_name.trim().to_string(),
            customer_email: req.customer_email.trim().to_string(),
            pickup_location: req.pickup_location,
            pickup_address: req.pickup_address,
            whatsapp_number: req.whatsapp_number,
            note: req.note_for_meetup,
            pricing_selections: req
                .pricing_options
                .into_iter()
                .map(|p| PricingSelection {
                    pricing_tier_id: p.pricing_option_id,
                    quantity: p.quantity,
                })
                .collect(),
            service_selections: req
                .additional_services
                .into_iter()
                .map(|s| ServiceSelection {
                    service_name: s.service_name,
                    service_type: s.service_type,
                    unit_price: s.price,
                    quantity: s.quantity,
                    catalog_service_id: s.additional_service_id,
                })
                .collect(),
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/bookings",
    responses(
        (status = 201, description = "Booking created with its line items"),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Tour or pricing option not found")
    )
)]
pub async fn create_booking(
    State(db): State<DatabaseConnection>,
    ValidatedJson(payload): ValidatedJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let booking = booking_service::create_booking(&db, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    params(("id" = i32, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking with line items and payments"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(booking_service::get_booking(&db, id).await?))
}

pub async fn list_bookings(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(
        booking_service::list_bookings(&db, params.page_request()).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
    pub page: Option<u64>,
    pub size: Option<u64>,
}

pub async fn list_bookings_by_email(
    State(db): State<DatabaseConnection>,
    Query(query): Query<EmailQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let email = query.email.trim();
    if email.is_empty() {
        return Err(ApiError::BadRequest("email is required".to_string()));
    }
    Ok(Json(
        booking_service::list_bookings_by_email(&db, email, PageRequest::new(query.page, query.size))
            .await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[utoipa::path(
    put,
    path = "/api/bookings/{id}/status",
    params(
        ("id" = i32, Path, description = "Booking id"),
        ("status" = String, Query, description = "PENDING, CONFIRMED, CANCELLED or COMPLETED")
    ),
    responses(
        (status = 200, description = "Updated booking"),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn update_booking_status(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Query(query): Query<StatusQuery>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    let status: BookingStatus = query.status.parse()?;
    Ok(Json(booking_service::update_status(&db, id, status).await?))
}

pub async fn cancel_booking(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    booking_service::cancel_booking(&db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_booking(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    booking_service::delete_booking(&db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct ReferenceQuery {
    pub reference: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/bookings/{id}/confirm-vietqr-payment",
    params(
        ("id" = i32, Path, description = "Booking id"),
        ("reference" = Option<String>, Query, description = "Bank transfer reference")
    ),
    responses(
        (status = 200, description = "Booking confirmed, payment pending verification"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn confirm_vietqr_payment(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
    Query(query): Query<ReferenceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(
        booking_service::confirm_vietqr_payment(&db, id, query.reference).await?,
    ))
}

#[derive(Debug, Deserialize)]
pub struct YearQuery {
    pub year: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/bookings/stats/yearly",
    params(("year" = Option<i32>, Query, description = "Defaults to the current year")),
    responses((status = 200, description = "Monthly counts and revenue of completed bookings"))
)]
pub async fn yearly_stats(
    State(db): State<DatabaseConnection>,
    Query(query): Query<YearQuery>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(report_service::yearly_stats(&db, query.year).await?))
}
