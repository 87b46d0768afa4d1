//! Booking domain: status machines, line-item pricing and the composed
//! booking representation returned to callers.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DomainError;

/// Payment method label for the manual bank-transfer (QR) channel
pub const VIETQR_METHOD: &str = "VietQR";
/// Currency recorded for manual bank-transfer payments
pub const VIETQR_CURRENCY: &str = "VND";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Completed => "COMPLETED",
        }
    }

    /// Natural lifecycle graph:
    /// PENDING -> {CONFIRMED, CANCELLED}, CONFIRMED -> {CANCELLED, COMPLETED}.
    /// CANCELLED and COMPLETED are terminal.
    pub fn is_natural_transition(self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) | (Confirmed, Completed)
        ) || self == next
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(BookingStatus::Pending),
            "CONFIRMED" => Ok(BookingStatus::Confirmed),
            "CANCELLED" => Ok(BookingStatus::Cancelled),
            "COMPLETED" => Ok(BookingStatus::Completed),
            other => Err(DomainError::Validation(format!(
                "Unknown booking status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PaymentStatus::Pending),
            "COMPLETED" => Ok(PaymentStatus::Completed),
            "FAILED" => Ok(PaymentStatus::Failed),
            "REFUNDED" => Ok(PaymentStatus::Refunded),
            other => Err(DomainError::Validation(format!(
                "Unknown payment status: {}",
                other
            ))),
        }
    }
}

fn out_of_range() -> DomainError {
    DomainError::Validation("Booking total out of range".to_string())
}

/// Subtotal of one line item: unit price times quantity, exact.
pub fn line_subtotal(unit_price: Decimal, quantity: i32) -> Result<Decimal, DomainError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(out_of_range)
}

/// Grand total over any set of line-item subtotals.
pub fn booking_total<I>(subtotals: I) -> Result<Decimal, DomainError>
where
    I: IntoIterator<Item = Decimal>,
{
    subtotals
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, s| acc.checked_add(s).ok_or_else(out_of_range))
}

/// Transaction reference used when the customer supplies none.
pub fn fallback_transaction_id(epoch_millis: i64) -> String {
    format!("{}-{}", VIETQR_METHOD, epoch_millis)
}

/// One selected pricing tier in a booking request
#[derive(Debug, Clone)]
pub struct PricingSelection {
    pub pricing_tier_id: i32,
    pub quantity: i32,
}

/// One selected add-on in a booking request. Name and price are taken
/// verbatim; the catalog id only links the line item when it resolves.
#[derive(Debug, Clone)]
pub struct ServiceSelection {
    pub service_name: String,
    pub service_type: Option<String>,
    pub unit_price: Decimal,
    pub quantity: i32,
    pub catalog_service_id: Option<i32>,
}

/// Input for composing a new booking
#[derive(Debug, Clone)]
pub struct CreateBookingInput {
    pub tour_id: i32,
    pub departure_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub customer_name: String,
    pub customer_email: String,
    pub pickup_location: Option<String>,
    pub pickup_address: Option<String>,
    pub whatsapp_number: Option<String>,
    pub note: Option<String>,
    pub pricing_selections: Vec<PricingSelection>,
    pub service_selections: Vec<ServiceSelection>,
}

impl CreateBookingInput {
    /// Every selection needs a quantity of at least 1; service prices
    /// must not be negative.
    pub fn validate_lines(&self) -> Result<(), DomainError> {
        if let Some(bad) = self.pricing_selections.iter().find(|s| s.quantity < 1) {
            return Err(DomainError::Validation(format!(
                "Quantity must be at least 1 (pricing option {})",
                bad.pricing_tier_id
            )));
        }
        if let Some(bad) = self.service_selections.iter().find(|s| s.quantity < 1) {
            return Err(DomainError::Validation(format!(
                "Quantity must be at least 1 (service '{}')",
                bad.service_name
            )));
        }
        if let Some(bad) = self
            .service_selections
            .iter()
            .find(|s| s.unit_price < Decimal::ZERO)
        {
            return Err(DomainError::Validation(format!(
                "Price must not be negative (service '{}')",
                bad.service_name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingPricingOption {
    pub id: i32,
    pub pricing_option_id: i32,
    pub customer_type: String,
    pub round_trip: bool,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingAdditionalService {
    pub id: i32,
    pub booking_id: i32,
    pub additional_service_id: Option<i32>,
    pub service_name: String,
    pub service_type: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: i32,
    pub booking_id: i32,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub amount: Decimal,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub payment_time: Option<NaiveDateTime>,
}

/// Booking header plus its three owned collections
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDetails {
    pub id: i32,
    pub tour_id: i32,
    pub tour_title: Option<String>,
    pub tour_image_url: Option<String>,
    pub customer_name: String,
    pub customer_email: String,
    pub departure_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub pickup_location: Option<String>,
    pub pickup_address: Option<String>,
    pub total_price: Decimal,
    pub booking_time: NaiveDateTime,
    pub status: BookingStatus,
    pub payment_id: Option<String>,
    pub whatsapp_number: Option<String>,
    pub note_for_meetup: Option<String>,
    pub pricing_options: Vec<BookingPricingOption>,
    pub additional_services: Vec<BookingAdditionalService>,
    pub payments: Vec<Payment>,
}

impl BookingDetails {
    /// Sum of every line-item subtotal currently attached.
    pub fn line_items_total(&self) -> Result<Decimal, DomainError> {
        booking_total(
            self.pricing_options
                .iter()
                .map(|o| o.subtotal)
                .chain(self.additional_services.iter().map(|s| s.subtotal)),
        )
    }
}
