use chrono::{Local, NaiveDate};

use crate::error::{Result, WeatherError};

/// Longest allowed distance between start and end, in days.
pub const MAX_RANGE_DAYS: i64 = 365;

/// Inclusive, validated calendar range that ends no later than "today".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered, both ends included.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Validate a range against `today`.
pub fn validate_range(start: NaiveDate, end: NaiveDate, today: NaiveDate) -> Result<DateRange> {
    if start > end {
        return Err(WeatherError::validation("Start date must be before end date"));
    }
    if end > today {
        return Err(WeatherError::validation("End date cannot be in the future"));
    }
    if (end - start).num_days() > MAX_RANGE_DAYS {
        return Err(WeatherError::validation("Date range cannot exceed 1 year"));
    }

    Ok(DateRange { start, end })
}

/// Parse `YYYY-MM-DD` inputs and validate them against the local calendar date.
pub fn parse_range(start: &str, end: &str) -> Result<DateRange> {
    let (start, end) = (start.trim(), end.trim());
    if start.is_empty() || end.is_empty() {
        return Err(WeatherError::validation("Both start and end dates are required"));
    }

    let start = parse_date(start)?;
    let end = parse_date(end)?;

    validate_range(start, end, Local::now().date_naive())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        WeatherError::validation(format!("Invalid date '{raw}', expected YYYY-MM-DD"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2024, 6, 15)
    }

    #[test]
    fn rejects_reversed_range() {
        let err = validate_range(date(2024, 2, 1), date(2024, 1, 1), today()).unwrap_err();
        assert_eq!(err, WeatherError::validation("Start date must be before end date"));
    }

    #[test]
    fn rejects_end_after_today() {
        let err = validate_range(date(2024, 1, 1), date(2024, 6, 16), today()).unwrap_err();
        assert_eq!(err, WeatherError::validation("End date cannot be in the future"));
    }

    #[test]
    fn rejects_range_longer_than_a_year() {
        let err = validate_range(date(2020, 1, 1), date(2021, 1, 3), today()).unwrap_err();
        assert_eq!(err, WeatherError::validation("Date range cannot exceed 1 year"));
    }

    #[test]
    fn accepts_leap_year_of_366_days() {
        let range = validate_range(date(2020, 1, 1), date(2020, 12, 31), today()).unwrap();
        assert_eq!(range.days(), 366);
    }

    #[test]
    fn accepts_ordinary_range() {
        let range = validate_range(date(2023, 1, 1), date(2023, 6, 1), today()).unwrap();
        assert_eq!(range.start(), date(2023, 1, 1));
        assert_eq!(range.end(), date(2023, 6, 1));
    }

    #[test]
    fn accepts_single_day_ending_today() {
        let range = validate_range(today(), today(), today()).unwrap();
        assert_eq!(range.days(), 1);
    }

    #[test]
    fn parse_range_requires_both_dates() {
        let err = parse_range("2023-01-01", "  ").unwrap_err();
        assert_eq!(err, WeatherError::validation("Both start and end dates are required"));
    }

    #[test]
    fn parse_range_rejects_malformed_dates() {
        let err = parse_range("2023-13-01", "2023-12-01").unwrap_err();
        assert!(matches!(err, WeatherError::Validation(msg) if msg.contains("2023-13-01")));
    }

    #[test]
    fn parse_range_rejects_tomorrow() {
        let tomorrow = Local::now().date_naive() + chrono::Duration::days(1);
        let err = parse_range("2020-01-01", &tomorrow.format("%Y-%m-%d").to_string()).unwrap_err();
        assert_eq!(err, WeatherError::validation("End date cannot be in the future"));
    }

    #[test]
    fn parse_range_accepts_past_range() {
        let range = parse_range("2023-01-01", "2023-06-01").unwrap();
        assert_eq!(range.days(), 152);
    }
}
