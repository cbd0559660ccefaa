//! Date utilities
//!
//! Age and post-op day arithmetic. The current time is always passed in so
//! results stay reproducible.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use super::error::{CalcError, CalcResult};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parse an ISO date ("2025-01-09"); errors name `field`
pub fn parse_iso_date(field: &'static str, s: &str) -> CalcResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| CalcError::invalid(field, format!("'{}' is not YYYY-MM-DD: {}", s, e)))
}

/// Age in whole years on `today`
///
/// One year is subtracted when the birthday (month and day) has not yet
/// come around in `today`'s year.
pub fn calculate_age(dob: NaiveDate, today: NaiveDate) -> CalcResult<u32> {
    if dob > today {
        return Err(CalcError::invalid("dob", format!("{} is after {}", dob, today)));
    }

    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }

    // dob <= today keeps this non-negative
    Ok(age.max(0) as u32)
}

/// Post-op day number at `now`
///
/// `ceil(|now - surgery_date 00:00 UTC| / 1 day)`, so any time on the day of
/// surgery after midnight is day 1. Future surgery dates count the same way.
pub fn days_since_surgery(surgery_date: NaiveDate, now: DateTime<Utc>) -> u32 {
    let surgery = surgery_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let millis = (now - surgery).num_milliseconds().abs();

    let days = (millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(s: &str) -> NaiveDate {
        parse_iso_date("date", s).unwrap()
    }

    #[test]
    fn test_parse_iso_date() {
        assert_eq!(date("2025-01-09"), NaiveDate::from_ymd_opt(2025, 1, 9).unwrap());
        assert!(parse_iso_date("date", "01/09/2025").is_err());
        assert!(parse_iso_date("date", "2025-02-30").is_err());
    }

    #[test]
    fn test_parse_iso_date_names_field() {
        let err = parse_iso_date("surgery_date", "2025/04/02").unwrap_err();
        assert!(matches!(
            err,
            CalcError::InvalidArgument { field: "surgery_date", .. }
        ));
        assert!(err.to_string().starts_with("Invalid surgery_date:"));
    }

    #[test]
    fn test_age_birthday_passed() {
        assert_eq!(calculate_age(date("1980-03-15"), date("2025-06-01")).unwrap(), 45);
    }

    #[test]
    fn test_age_birthday_not_yet() {
        assert_eq!(calculate_age(date("1980-09-15"), date("2025-06-01")).unwrap(), 44);
    }

    #[test]
    fn test_age_same_month() {
        assert_eq!(calculate_age(date("1980-06-20"), date("2025-06-10")).unwrap(), 44);
        assert_eq!(calculate_age(date("1980-06-10"), date("2025-06-10")).unwrap(), 45);
        assert_eq!(calculate_age(date("1980-06-01"), date("2025-06-10")).unwrap(), 45);
    }

    #[test]
    fn test_age_leap_day() {
        assert_eq!(calculate_age(date("2000-02-29"), date("2025-02-28")).unwrap(), 24);
        assert_eq!(calculate_age(date("2000-02-29"), date("2025-03-01")).unwrap(), 25);
    }

    #[test]
    fn test_age_rejects_future_dob() {
        assert!(calculate_age(date("2030-01-01"), date("2025-01-01")).is_err());
        assert_eq!(calculate_age(date("2025-01-01"), date("2025-01-01")).unwrap(), 0);
    }

    #[test]
    fn test_days_since_surgery_counts_partial_days_up() {
        let surgery = date("2025-01-01");
        let same_day = Utc.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(days_since_surgery(surgery, same_day), 1);

        let next_day = Utc.with_ymd_and_hms(2025, 1, 2, 10, 0, 0).unwrap();
        assert_eq!(days_since_surgery(surgery, next_day), 2);

        let midnight = Utc.with_ymd_and_hms(2025, 1, 31, 0, 0, 0).unwrap();
        assert_eq!(days_since_surgery(surgery, midnight), 30);
        assert_eq!(days_since_surgery(surgery, surgery.and_hms_opt(0, 0, 0).unwrap().and_utc()), 0);
    }

    #[test]
    fn test_days_since_surgery_future_date_is_positive() {
        let surgery = date("2025-03-10");
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
        // 8.5 days away
        assert_eq!(days_since_surgery(surgery, now), 9);
    }
}
