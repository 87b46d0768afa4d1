//! Storage encodings for money and calendar values.
//!
//! SQLite has no exact numeric type, so money is persisted as the canonical
//! decimal string and parsed back into `Decimal`. Dates and timestamps use
//! fixed-width formats so that lexical order equals chronological order.

use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;

use super::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse_money(raw: &str) -> Result<Decimal, DomainError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| DomainError::Internal(format!("Corrupt money value '{}': {}", raw, e)))
}

pub fn money_to_db(value: Decimal) -> String {
    value.to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| DomainError::Internal(format!("Corrupt date value '{}': {}", raw, e)))
}

pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<NaiveDate>, DomainError> {
    raw.map(parse_date).transpose()
}

pub fn date_to_db(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, DomainError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map_err(|e| DomainError::Internal(format!("Corrupt timestamp '{}': {}", raw, e)))
}

pub fn timestamp_to_db(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Local wall-clock time truncated to whole seconds (the stored precision).
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_keeps_scale_through_storage() {
        let stored = money_to_db(Decimal::new(5700, 2));
        assert_eq!(stored, "57.00");
        assert_eq!(parse_money(&stored).unwrap(), Decimal::new(57, 0));
    }

    #[test]
    fn corrupt_money_is_internal_error() {
        assert!(matches!(parse_money("12,50"), Err(DomainError::Internal(_))));
    }

    #[test]
    fn timestamps_sort_lexically() {
        let a = timestamp_to_db(parse_timestamp("2024-03-09 23:59:59").unwrap());
        let b = timestamp_to_db(parse_timestamp("2024-03-10 00:00:00").unwrap());
        assert!(a < b);
    }
}
