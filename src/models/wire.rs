// src/models/wire.rs
//! Serde helpers for request bodies.

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a wall-clock timestamp. Offset-bearing (RFC 3339) input is
/// normalised to UTC; naive input is taken as given.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

pub fn datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!(
            "invalid datetime '{}', expected YYYY-MM-DDThh:mm[:ss]",
            raw
        ))
    })
}

pub fn optional_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    datetime(deserializer).map(Some)
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates. Use with `#[serde(default)]`.
pub fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        doctor: Option<Option<String>>,
        #[serde(default, deserialize_with = "optional_datetime")]
        scheduled_at: Option<NaiveDateTime>,
    }

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap().and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(parse_datetime("2024-01-20T09:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-20T09:00:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-20 09:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-20T12:00:00+03:00"), Some(expected));
        assert_eq!(parse_datetime("2024-01-20T09:00:00Z"), Some(expected));
        assert_eq!(parse_datetime("20/01/2024"), None);
    }

    #[test]
    fn test_nullable_distinguishes_absent_and_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.doctor, None);
        assert_eq!(absent.scheduled_at, None);

        let cleared: Patch = serde_json::from_str(r#"{"doctor": null}"#).unwrap();
        assert_eq!(cleared.doctor, Some(None));

        let set: Patch =
            serde_json::from_str(r#"{"doctor": "abc", "scheduled_at": "2024-01-21T11:00"}"#)
                .unwrap();
        assert_eq!(set.doctor, Some(Some("abc".to_string())));
        assert!(set.scheduled_at.is_some());
    }

    #[test]
    fn test_bad_datetime_is_data_error() {
        let err = serde_json::from_str::<Patch>(r#"{"scheduled_at": "tomorrow"}"#).err().unwrap();
        assert!(err.is_data());
    }
}
