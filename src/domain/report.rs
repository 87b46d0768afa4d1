//! Yearly revenue statistics over completed bookings.

use chrono::{Datelike, NaiveDateTime};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::BookingStatus;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Booking counts per calendar month. Serializes as a JSON object whose
/// keys are always the twelve month names in calendar order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyCounts([u32; 12]);

impl MonthlyCounts {
    /// `month` is 1-based; out-of-range values are ignored.
    pub fn record(&mut self, month: u32) {
        if let Some(slot) = month.checked_sub(1).and_then(|i| self.0.get_mut(i as usize)) {
            *slot += 1;
        }
    }

    pub fn get(&self, month_name: &str) -> Option<u32> {
        MONTH_NAMES
            .iter()
            .position(|m| *m == month_name)
            .map(|i| self.0[i])
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

impl Serialize for MonthlyCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MONTH_NAMES.len()))?;
        for (name, count) in MONTH_NAMES.iter().zip(self.0.iter()) {
            map.serialize_entry(name, count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyStats {
    pub year: i32,
    pub monthly_counts: MonthlyCounts,
    pub labels: Vec<&'static str>,
    pub data: Vec<u32>,
    pub total_revenue: Decimal,
}

impl YearlyStats {
    /// Buckets bookings by month of `booking_time`. Only COMPLETED bookings
    /// inside `year` contribute to counts and revenue.
    pub fn aggregate<I>(year: i32, bookings: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, BookingStatus, Decimal)>,
    {
        let mut counts = MonthlyCounts::default();
        let mut revenue = Decimal::ZERO;

        for (booked_at, status, total) in bookings {
            if status != BookingStatus::Completed || booked_at.year() != year {
                continue;
            }
            counts.record(booked_at.month());
            revenue += total;
        }

        YearlyStats {
            year,
            monthly_counts: counts,
            labels: MONTH_NAMES.to_vec(),
            data: counts.as_slice().to_vec(),
            total_revenue: revenue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn buckets_completed_bookings_by_month() {
        let hundred = Decimal::new(10000, 2);
        let stats = YearlyStats::aggregate(
            2024,
            vec![
                (at(2024, 3, 1), BookingStatus::Completed, hundred),
                (at(2024, 3, 28), BookingStatus::Completed, hundred),
                (at(2024, 4, 2), BookingStatus::Pending, hundred),
                (at(2024, 5, 2), BookingStatus::Cancelled, hundred),
                (at(2023, 3, 2), BookingStatus::Completed, hundred),
            ],
        );

        assert_eq!(stats.monthly_counts.get("March"), Some(2));
        assert_eq!(stats.data.iter().sum::<u32>(), 2);
        assert_eq!(stats.total_revenue, Decimal::new(20000, 2));
    }

    #[test]
    fn empty_year_has_twelve_zero_months() {
        let stats = YearlyStats::aggregate(2030, Vec::new());
        assert_eq!(stats.labels.len(), 12);
        assert_eq!(stats.data, vec![0; 12]);
        assert_eq!(stats.total_revenue, Decimal::ZERO);
    }

    #[test]
    fn month_keys_serialize_in_calendar_order() {
        let json = serde_json::to_string(&MonthlyCounts::default()).unwrap();
        let jan = json.find("January").unwrap();
        let feb = json.find("February").unwrap();
        let dec = json.find("December").unwrap();
        assert!(jan < feb && feb < dec);
    }
}
