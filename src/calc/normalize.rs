use crate::calc::error::{CalendarError, CalendarResult};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A date-like value handed in by the host: either text as found in the
/// event data, a bare calendar date, or an instant.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum DateInput {
    Instant(DateTime<Utc>),
    Date(NaiveDate),
    Text(String),
}

impl From<&str> for DateInput {
    fn from(s: &str) -> Self {
        DateInput::Text(s.to_string())
    }
}

impl From<String> for DateInput {
    fn from(s: String) -> Self {
        DateInput::Text(s)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(d: NaiveDate) -> Self {
        DateInput::Date(d)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(dt: DateTime<Utc>) -> Self {
        DateInput::Instant(dt)
    }
}

/// A calendar day in UTC. `month` is zero-based (0 = January) to match the
/// month-name tables; `instant` is the input the day was derived from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub instant: DateTime<Utc>,
}

impl NormalizedDate {
    pub fn key(&self) -> (i32, u32, u32) {
        (self.year, self.month, self.day)
    }
}

/// Formats a (year, zero-based month, day) triple as `YYYY-MM-DD`.
pub fn format_date_key(year: i32, month: u32, day: u32) -> String {
    format!("{year:04}-{:02}-{day:02}", month + 1)
}

/// UTC midnight of a (year, zero-based month, day) triple, if it is a real day.
pub fn utc_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month + 1, day).map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Datetimes without an offset are read as UTC wall-clock time.
const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Truncates `input` to its UTC calendar day.
pub fn normalize(input: &DateInput) -> CalendarResult<NormalizedDate> {
    let instant = match input {
        DateInput::Instant(dt) => *dt,
        DateInput::Date(d) => d.and_time(NaiveTime::MIN).and_utc(),
        DateInput::Text(s) => parse_instant(s)?,
    };
    Ok(NormalizedDate {
        year: instant.year(),
        month: instant.month0(),
        day: instant.day(),
        instant,
    })
}

fn parse_instant(raw: &str) -> CalendarResult<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(NaiveTime::MIN).and_utc());
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(ndt.and_utc());
        }
    }
    Err(CalendarError::InvalidDate(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_plain_date_string() {
        let n = normalize(&"2024-03-05".into()).unwrap();
        assert_eq!(n.key(), (2024, 2, 5));
        assert_eq!(format_date_key(n.year, n.month, n.day), "2024-03-05");
    }

    #[test]
    fn test_normalize_uses_utc_not_local_offset() {
        // 23:30 at -05:00 is already the next day in UTC
        let n = normalize(&"2024-03-05T23:30:00-05:00".into()).unwrap();
        assert_eq!(n.key(), (2024, 2, 6));
    }

    #[test]
    fn test_normalize_discards_time_of_day() {
        let n = normalize(&"2024-12-31T23:59:59Z".into()).unwrap();
        assert_eq!(n.key(), (2024, 11, 31));
        let original = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(n.instant, original);
    }

    #[test]
    fn test_normalize_naive_datetime_read_as_utc() {
        let n = normalize(&"2025-01-10 09:00".into()).unwrap();
        assert_eq!(n.key(), (2025, 0, 10));
    }

    #[test]
    fn test_normalize_instant_and_date_inputs() {
        let dt = Utc.with_ymd_and_hms(2023, 7, 1, 18, 0, 0).unwrap();
        assert_eq!(normalize(&dt.into()).unwrap().key(), (2023, 6, 1));
        let d = NaiveDate::from_ymd_opt(2023, 7, 2).unwrap();
        assert_eq!(normalize(&d.into()).unwrap().key(), (2023, 6, 2));
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        let err = normalize(&"next tuesday".into()).unwrap_err();
        assert_eq!(err, CalendarError::InvalidDate("next tuesday".to_string()));
    }

    #[test]
    fn test_normalize_rejects_impossible_day() {
        assert!(normalize(&"2024-02-30".into()).is_err());
    }

    #[test]
    fn test_format_date_key_pads() {
        assert_eq!(format_date_key(2024, 0, 1), "2024-01-01");
        assert_eq!(format_date_key(2024, 11, 25), "2024-12-25");
    }

    #[test]
    fn test_utc_midnight() {
        let m = utc_midnight(2024, 2, 5).unwrap();
        assert_eq!(m, Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap());
        assert!(utc_midnight(2024, 1, 30).is_none());
    }

    #[test]
    fn test_date_input_deserializes_from_json_string() {
        let input: DateInput = serde_json::from_str("\"2024-03-05\"").unwrap();
        assert_eq!(normalize(&input).unwrap().key(), (2024, 2, 5));
    }
}
