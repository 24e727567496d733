//! ISO-8601 (de)serialization for [`Timestamp`] fields of persisted records.
//!
//! Timestamps are written as RFC 3339 strings in UTC. On read, strings
//! without an offset (`2024-05-01T10:00:00.123456`) are accepted too and
//! interpreted as UTC, so snapshots written by older tooling still load.

use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serializer};

/// Parses an ISO-8601 timestamp, with or without a UTC offset.
pub fn parse(value: &str) -> Result<Timestamp, jiff::Error> {
    let value = value.trim();
    match value.parse::<Timestamp>() {
        Ok(ts) => Ok(ts),
        Err(offset_err) => value
            .parse::<DateTime>()
            .and_then(|naive| naive.to_zoned(TimeZone::UTC))
            .map(|zoned| zoned.timestamp())
            .map_err(|_| offset_err),
    }
}

pub fn serialize<S>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(value)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Timestamp, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Same as the parent module for `Option<Timestamp>`; `null` maps to `None`.
pub mod option {
    use super::parse;
    use jiff::Timestamp;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Timestamp>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(ts) => serializer.collect_str(ts),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => parse(value).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339() {
        let ts = parse("2024-05-01T10:00:00Z").unwrap();
        assert_eq!(ts.as_second(), 1_714_557_600);
    }

    #[test]
    fn parses_offset() {
        let ts = parse("2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(ts.as_second(), 1_714_557_600);
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse("2024-05-01T10:00:00.123456").unwrap();
        assert_eq!(ts.as_second(), 1_714_557_600);
        assert_eq!(ts.subsec_microsecond(), 123_456);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }
}
