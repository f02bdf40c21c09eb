use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::ValidationError;
use crate::model::calendar::{parse_date_key, MonthRef};

pub const DEFAULT_TIME_ZONE: &str = "UTC";

/// Source of the current instant. Services take a clock instead of calling
/// `Utc::now()` so "today" can be pinned in tests.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date in the given zone at this instant.
    fn today_in(&self, tz: Tz) -> NaiveDate {
        self.now().with_timezone(&tz).date_naive()
    }

    /// Calendar date on this machine's local clock.
    fn today_local(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Noon UTC on `date`, which is the same calendar day in every zone
    /// within twelve hours of UTC.
    pub fn at_date(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn is_valid_time_zone(raw: &str) -> bool {
    let trimmed = raw.trim();
    !trimmed.is_empty() && trimmed.parse::<Tz>().is_ok()
}

/// Resolves an IANA zone id. Blank or unknown ids fall back to UTC so a bad
/// stored value never blocks a computation.
pub fn resolve_time_zone(raw: &str) -> Tz {
    let trimmed = raw.trim();
    match trimmed.parse::<Tz>() {
        Ok(tz) if !trimmed.is_empty() => tz,
        Ok(_) | Err(_) => {
            warn!(timezone = %trimmed, fallback = DEFAULT_TIME_ZONE, "unknown time zone, falling back");
            Tz::UTC
        }
    }
}

/// The zone this machine is configured for, or UTC when it cannot be told.
pub fn system_time_zone() -> String {
    match iana_time_zone::get_timezone() {
        Ok(zone) if is_valid_time_zone(&zone) => zone,
        Ok(zone) => {
            warn!(timezone = %zone, "system time zone is not a known IANA id");
            DEFAULT_TIME_ZONE.to_string()
        }
        Err(error) => {
            warn!(error = %error, "could not determine system time zone");
            DEFAULT_TIME_ZONE.to_string()
        }
    }
}

/// Parses a `YYYY-MM` month typed by the user.
pub fn parse_month_input(raw: &str) -> Result<MonthRef, ValidationError> {
    raw.trim().parse()
}

/// Parses a `YYYY-MM-DD` date typed by the user.
pub fn parse_date_input(raw: &str) -> Result<NaiveDate, ValidationError> {
    parse_date_key(raw.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_resolve_time_zone_falls_back_to_utc() {
        assert_eq!(resolve_time_zone("Europe/Moscow"), Tz::Europe__Moscow);
        assert_eq!(resolve_time_zone(" Asia/Vladivostok "), Tz::Asia__Vladivostok);
        assert_eq!(resolve_time_zone("Mars/Olympus"), Tz::UTC);
        assert_eq!(resolve_time_zone(""), Tz::UTC);
    }

    #[test]
    fn test_is_valid_time_zone() {
        assert!(is_valid_time_zone("UTC"));
        assert!(is_valid_time_zone("Asia/Kamchatka"));
        assert!(!is_valid_time_zone(""));
        assert!(!is_valid_time_zone("Moscow"));
    }

    #[test]
    fn test_today_depends_on_zone() {
        // 22:30 UTC on Jan 1 is already Jan 2 in Moscow (UTC+3).
        let clock = FixedClock(Utc.with_ymd_and_hms(2024, 1, 1, 22, 30, 0).unwrap());
        assert_eq!(clock.today_in(Tz::UTC), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(
            clock.today_in(Tz::Europe__Moscow),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
        assert_eq!(
            clock.today_in(Tz::America__New_York),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_fixed_clock_at_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let clock = FixedClock::at_date(date);
        assert_eq!(clock.today_in(Tz::UTC), date);
        assert_eq!(clock.today_in(Tz::Europe__Berlin), date);
    }

    #[test]
    fn test_parse_inputs() {
        assert_eq!(parse_month_input(" 2024-02 ").unwrap(), MonthRef::new(2024, 1).unwrap());
        assert_eq!(parse_month_input("2024-13"), Err(ValidationError::Month("2024-13".into())));
        assert_eq!(
            parse_date_input("2024-02-29").unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert!(parse_date_input("2023-02-29").is_err());
    }
}
