//! Freshness of a stocked product relative to a calendar day.

use chrono::NaiveDate;
use serde::Serialize;

/// Days-until-expiry reported when a product carries no expiry date.
pub const UNKNOWN_DAYS: i64 = -1;

/// Above this many days remaining a product is simply "Fresh".
const COUNTDOWN_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpiryStatus {
    pub is_expired: bool,
    pub days_until_expiry: i64,
}

impl ExpiryStatus {
    /// Evaluate `expiry` as seen on `today`.
    ///
    /// A missing date is never expired and reports [`UNKNOWN_DAYS`].
    #[must_use]
    pub fn evaluate(expiry: Option<NaiveDate>, today: NaiveDate) -> Self {
        match expiry {
            Some(date) => {
                let days = (date - today).num_days();
                Self {
                    is_expired: days < 0,
                    days_until_expiry: days,
                }
            }
            None => Self {
                is_expired: false,
                days_until_expiry: UNKNOWN_DAYS,
            },
        }
    }

    /// Badge text for a product with a known expiry date.
    ///
    /// Returns `None` when `expiry` was absent, since nothing should be shown.
    #[must_use]
    pub fn label(&self, expiry: Option<NaiveDate>) -> Option<String> {
        expiry?;
        let label = if self.is_expired {
            "Expired".to_string()
        } else {
            match self.days_until_expiry {
                0 => "Expires Today".to_string(),
                1 => "Expires Tomorrow".to_string(),
                n if n <= COUNTDOWN_DAYS => format!("{n} days left"),
                _ => "Fresh".to_string(),
            }
        };
        Some(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn unknown_expiry_is_not_expired() {
        let status = ExpiryStatus::evaluate(None, day(2026, 5, 1));
        assert!(!status.is_expired);
        assert_eq!(status.days_until_expiry, UNKNOWN_DAYS);
        assert_eq!(status.label(None), None);
    }

    #[test]
    fn yesterday_is_expired() {
        let expiry = Some(day(2026, 4, 30));
        let status = ExpiryStatus::evaluate(expiry, day(2026, 5, 1));
        assert!(status.is_expired);
        assert_eq!(status.days_until_expiry, -1);
        assert_eq!(status.label(expiry).as_deref(), Some("Expired"));
    }

    #[test]
    fn today_and_tomorrow_labels() {
        let today = day(2026, 5, 1);
        let same_day = Some(today);
        let status = ExpiryStatus::evaluate(same_day, today);
        assert!(!status.is_expired);
        assert_eq!(status.label(same_day).as_deref(), Some("Expires Today"));

        let next_day = Some(day(2026, 5, 2));
        let status = ExpiryStatus::evaluate(next_day, today);
        assert_eq!(status.label(next_day).as_deref(), Some("Expires Tomorrow"));
    }

    #[test]
    fn countdown_up_to_thirty_days_then_fresh() {
        let today = day(2026, 5, 1);
        let in_thirty = Some(day(2026, 5, 31));
        let status = ExpiryStatus::evaluate(in_thirty, today);
        assert_eq!(status.days_until_expiry, 30);
        assert_eq!(status.label(in_thirty).as_deref(), Some("30 days left"));

        let in_thirty_one = Some(day(2026, 6, 1));
        let status = ExpiryStatus::evaluate(in_thirty_one, today);
        assert_eq!(status.label(in_thirty_one).as_deref(), Some("Fresh"));
    }

    #[test]
    fn serializes_camel_case() {
        let status = ExpiryStatus::evaluate(Some(day(2026, 5, 8)), day(2026, 5, 1));
        let json = serde_json::to_value(status).unwrap();
        assert_eq!(json["isExpired"], false);
        assert_eq!(json["daysUntilExpiry"], 7);
    }
}
