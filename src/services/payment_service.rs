//! Payment Service - manual verification of recorded payments

use sea_orm::*;

use super::booking_service::payment_from_model;
use crate::domain::values::{now, timestamp_to_db};
use crate::domain::{DomainError, Payment, PaymentStatus};
use crate::models::payment;

/// Mark a payment COMPLETED and refresh its timestamp. The owning booking
/// is left untouched.
pub async fn verify_payment(db: &DatabaseConnection, id: i32) -> Result<Payment, DomainError> {
    let existing = payment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DomainError::not_found("Payment", id))?;

    let mut active: payment::ActiveModel = existing.into();
    active.payment_status = Set(PaymentStatus::Completed.as_str().to_string());
    active.payment_time = Set(Some(timestamp_to_db(now())));

    let result = active.update(db).await?;
    tracing::info!(
        "Payment {} for booking {} verified",
        result.id,
        result.booking_id
    );
    payment_from_model(result)
}
