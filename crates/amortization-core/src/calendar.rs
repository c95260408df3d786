//! Calendar arithmetic for monthly installments.
//!
//! Month addition clamps to the last day of the target month, elapsed months
//! are counted inclusively (the start month is month 1), and start dates are
//! accepted in the three textual layouts loan records use.

use chrono::{Datelike, Local, Months, NaiveDate};

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Add `months` calendar months to `date`.
///
/// When the day-of-month does not exist in the target month the result is
/// clamped to that month's last day (Jan 31 + 1 month = Feb 28, or Feb 29 in
/// a leap year). Saturates at `NaiveDate::MAX` on overflow.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

/// Inclusive count of calendar months from `start` to `current`.
///
/// `(cy - sy) * 12 + (cm - sm) + 1`: a loan started in October counts two
/// elapsed months anywhere in November. Days are ignored. A `current` before
/// the start month yields zero or a negative count.
pub fn months_elapsed(start: NaiveDate, current: NaiveDate) -> i64 {
    let years = i64::from(current.year()) - i64::from(start.year());
    let months = i64::from(current.month()) - i64::from(start.month());
    years * 12 + months + 1
}

/// Parse a start date written as `YYYY-MM-DD`, `YYYY-MM` or `MM/YYYY`.
///
/// The two month-only layouts resolve to the first day of the month.
/// Returns `None` for anything else.
pub fn parse_start_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if text.contains('-') && text.len() == 10 {
        return NaiveDate::parse_from_str(text, "%Y-%m-%d").ok();
    }

    if text.contains('-') && text.len() == 7 {
        return NaiveDate::parse_from_str(&format!("{text}-01"), "%Y-%m-%d").ok();
    }

    if text.contains('/') {
        let parts: Vec<&str> = text.split('/').collect();
        if let [month, year] = parts.as_slice() {
            let month = month.trim();
            let year = year.trim();
            return NaiveDate::parse_from_str(&format!("{year}-{month:0>2}-01"), "%Y-%m-%d")
                .ok();
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_add_months_clamps_to_leap_february() {
        assert_eq!(add_months(date(2024, 1, 31), 1), date(2024, 2, 29));
    }

    #[test]
    fn test_add_months_clamps_to_common_february() {
        assert_eq!(add_months(date(2023, 1, 31), 1), date(2023, 2, 28));
    }

    #[test]
    fn test_add_months_carries_year() {
        assert_eq!(add_months(date(2025, 11, 15), 3), date(2026, 2, 15));
        assert_eq!(add_months(date(2025, 1, 1), 24), date(2027, 1, 1));
    }

    #[test]
    fn test_add_months_zero_is_identity() {
        assert_eq!(add_months(date(2025, 3, 31), 0), date(2025, 3, 31));
    }

    #[test]
    fn test_add_months_thirty_first_to_thirty_day_month() {
        assert_eq!(add_months(date(2025, 3, 31), 1), date(2025, 4, 30));
    }

    #[test]
    fn test_months_elapsed_counts_start_month() {
        // October start, mid-November: October and November both count.
        assert_eq!(months_elapsed(date(2025, 10, 1), date(2025, 11, 15)), 2);
    }

    #[test]
    fn test_months_elapsed_same_month_is_one() {
        assert_eq!(months_elapsed(date(2025, 10, 1), date(2025, 10, 31)), 1);
        assert_eq!(months_elapsed(date(2025, 10, 31), date(2025, 10, 1)), 1);
    }

    #[test]
    fn test_months_elapsed_across_years() {
        assert_eq!(months_elapsed(date(2024, 10, 1), date(2024, 12, 28)), 3);
        assert_eq!(months_elapsed(date(2023, 12, 1), date(2025, 1, 1)), 14);
    }

    #[test]
    fn test_months_elapsed_before_start() {
        assert_eq!(months_elapsed(date(2025, 10, 1), date(2025, 9, 30)), 0);
        assert_eq!(months_elapsed(date(2025, 10, 1), date(2025, 7, 1)), -2);
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(parse_start_date("2025-01-15"), Some(date(2025, 1, 15)));
    }

    #[test]
    fn test_parse_year_month() {
        assert_eq!(parse_start_date("2024-10"), Some(date(2024, 10, 1)));
    }

    #[test]
    fn test_parse_month_slash_year() {
        assert_eq!(parse_start_date("03/2023"), Some(date(2023, 3, 1)));
        assert_eq!(parse_start_date("3/2023"), Some(date(2023, 3, 1)));
    }

    #[test]
    fn test_parse_rejects_other_layouts() {
        assert_eq!(parse_start_date(""), None);
        assert_eq!(parse_start_date("not a date"), None);
        assert_eq!(parse_start_date("2025-13-01"), None);
        assert_eq!(parse_start_date("15/03/2023"), None);
        assert_eq!(parse_start_date("2025/01"), None);
    }
}
