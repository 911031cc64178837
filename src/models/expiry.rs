//! Time to expiry
//!
//! Calendar-day count between a reference date and an option's maturity.

use chrono::{Duration, NaiveDate};

use crate::core::{BsmError, BsmResult};

/// Accepted maturity format (ISO 8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Calendar days used to convert a day count into a year fraction
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Parse a `YYYY-MM-DD` maturity
pub fn parse_maturity(maturity: &str) -> BsmResult<NaiveDate> {
    NaiveDate::parse_from_str(maturity.trim(), DATE_FORMAT)
        .map_err(|e| BsmError::InvalidDateFormat(format!("{:?}: {}", maturity, e)))
}

/// Signed days from `today` to `maturity`; negative once expired
pub fn days_between(maturity: NaiveDate, today: NaiveDate) -> i64 {
    (maturity - today).num_days()
}

/// Signed days from `today` to a textual maturity
pub fn days_to_expiry(maturity: &str, today: NaiveDate) -> BsmResult<i64> {
    let maturity = parse_maturity(maturity)?;
    Ok(days_between(maturity, today))
}

/// Day count as a fraction of a 365-day year
pub fn year_fraction(days: i64) -> f64 {
    days as f64 / DAYS_PER_YEAR
}

/// Inverse of [`days_between`]
pub fn maturity_after(today: NaiveDate, days: i64) -> NaiveDate {
    today + Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_to_expiry() {
        let today = date(2025, 1, 20);
        assert_eq!(days_to_expiry("2025-06-20", today).unwrap(), 151);
        assert_eq!(days_to_expiry("2025-01-20", today).unwrap(), 0);
        assert_eq!(days_to_expiry("2026-01-20", today).unwrap(), 365);
    }

    #[test]
    fn test_past_maturity_is_negative() {
        let today = date(2025, 1, 20);
        assert_eq!(days_to_expiry("2025-01-10", today).unwrap(), -10);
    }

    #[test]
    fn test_leap_year() {
        assert_eq!(days_to_expiry("2024-03-01", date(2024, 2, 28)).unwrap(), 2);
    }

    #[test]
    fn test_invalid_format() {
        let today = date(2025, 1, 20);
        for bad in ["2025/06/20", "20-06-2025", "2025-13-01", "2025-02-30", "", "soon"] {
            let err = days_to_expiry(bad, today).unwrap_err();
            assert!(matches!(err, BsmError::InvalidDateFormat(_)), "{} parsed", bad);
        }
    }

    #[test]
    fn test_year_fraction() {
        assert_eq!(year_fraction(365), 1.0);
        assert_eq!(year_fraction(0), 0.0);
        assert!(year_fraction(-30) < 0.0);
    }

    fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (1990i32..2100, 1u32..=12, 1u32..=28).prop_map(|(y, m, d)| date(y, m, d))
    }

    proptest! {
        #[test]
        fn test_expiry_round_trip(maturity in date_strategy(), today in date_strategy()) {
            let text = maturity.format(DATE_FORMAT).to_string();
            let days = days_to_expiry(&text, today).unwrap();
            prop_assert_eq!(maturity_after(today, days), maturity);
        }
    }
}
