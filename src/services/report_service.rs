//! Report Service - read-only revenue aggregation

use chrono::Datelike;
use sea_orm::*;

use crate::domain::values::{now, parse_money, parse_timestamp};
use crate::domain::{BookingStatus, DomainError, YearlyStats};
use crate::models::booking;

/// Monthly counts and revenue of COMPLETED bookings whose booking time
/// falls in `year` (the current year when `None`).
pub async fn yearly_stats(
    db: &DatabaseConnection,
    year: Option<i32>,
) -> Result<YearlyStats, DomainError> {
    let year = year.unwrap_or_else(|| now().year());
    if !(1..9999).contains(&year) {
        return Err(DomainError::Validation(format!("Invalid year: {}", year)));
    }

    // Timestamps are fixed-width text, so a lexical range selects the year
    let from = format!("{:04}-01-01 00:00:00", year);
    let to = format!("{:04}-01-01 00:00:00", year + 1);

    let rows = booking::Entity::find()
        .filter(booking::Column::Status.eq(BookingStatus::Completed.as_str()))
        .filter(booking::Column::BookingTime.gte(from))
        .filter(booking::Column::BookingTime.lt(to))
        .all(db)
        .await?;

    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        entries.push((
            parse_timestamp(&row.booking_time)?,
            row.status.parse::<BookingStatus>()?,
            parse_money(&row.total_price)?,
        ));
    }

    let stats = YearlyStats::aggregate(year, entries);
    tracing::debug!(
        "Yearly stats {}: {} completed booking(s), revenue {}",
        year,
        stats.data.iter().sum::<u32>(),
        stats.total_revenue
    );
    Ok(stats)
}
