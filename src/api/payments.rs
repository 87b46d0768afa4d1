use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};
use sea_orm::DatabaseConnection;

use super::error::ApiError;
use crate::auth::Claims;
use crate::services::payment_service;

#[utoipa::path(
    post,
    path = "/api/payments/{id}/verify",
    params(("id" = i32, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment marked COMPLETED"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Payment not found")
    )
)]
pub async fn verify_payment(
    claims: Claims,
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    claims.require_admin()?;
    Ok(Json(payment_service::verify_payment(&db, id).await?))
}
