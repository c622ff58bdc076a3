//! Wire formats shared with the REST API
//!
//! Dates travel as `YYYY-MM-DD` and datetimes as `YYYY-MM-DD HH:mm:ss`.
//! Parsing is lenient about the `T` separator, missing seconds and
//! fractional seconds; formatting is always canonical.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Canonical date format
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical datetime format
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const DATETIME_INPUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// Parse a date, also accepting a datetime and keeping its date part
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

/// Parse a datetime; a bare date is read as midnight
pub fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATETIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Format a datetime for a `datetime-local` input
pub fn format_datetime_input(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M").to_string()
}

/// Serde adapter for `NaiveDate` fields
pub mod date {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(value: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw)))
    }
}

/// Serde adapter for optional `NaiveDate` fields
pub mod option_date {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_str(&format_date(d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse_date(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid date '{}'", raw))),
            _ => Ok(None),
        }
    }
}

/// Serde adapter for `NaiveDateTime` fields
pub mod datetime {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_datetime(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_datetime(&raw).ok_or_else(|| D::Error::custom(format!("invalid datetime '{}'", raw)))
    }
}

/// Serde adapter for optional `NaiveDateTime` fields
pub mod option_datetime {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&format_datetime(dt)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => parse_datetime(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid datetime '{}'", raw))),
            _ => Ok(None),
        }
    }
}

/// Decimals arrive either as JSON numbers or as numeric strings
pub mod decimal {
    use serde::{Deserialize, Deserializer, de::Error};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    fn to_f64<E: Error>(raw: Raw) -> Result<f64, E> {
        match raw {
            Raw::Number(v) => Ok(v),
            Raw::Text(s) => atelier_core::types::parse_number(&s)
                .ok_or_else(|| E::custom(format!("invalid decimal '{}'", s))),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        to_f64(Raw::deserialize(deserializer)?)
    }

    pub mod option {
        use super::*;

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<f64>, D::Error> {
            match Option::<Raw>::deserialize(deserializer)? {
                Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
                Some(raw) => to_f64(raw).map(Some),
                None => Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_datetime_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        assert_eq!(parse_datetime("2024-05-02 14:30:00"), Some(expected));
        assert_eq!(parse_datetime("2024-05-02T14:30"), Some(expected));
        assert_eq!(parse_datetime("2024-05-02T14:30:00.000000Z"), Some(expected));
        assert_eq!(
            parse_datetime("2024-05-02"),
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_datetime("02/05/2024"), None);
        assert_eq!(parse_datetime(""), None);
    }

    #[test]
    fn test_parse_date_accepts_datetime() {
        let expected = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(parse_date("2023-12-31"), Some(expected));
        assert_eq!(parse_date("2023-12-31 08:00:00"), Some(expected));
        assert_eq!(parse_date("31-12-2023"), None);
    }

    #[test]
    fn test_canonical_formatting() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 9)
            .unwrap()
            .and_hms_opt(7, 5, 3)
            .unwrap();
        assert_eq!(format_datetime(&dt), "2024-01-09 07:05:03");
        assert_eq!(format_date(&dt.date()), "2024-01-09");
        assert_eq!(format_datetime_input(&dt), "2024-01-09T07:05");
    }

    #[test]
    fn test_serde_adapters() {
        #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq)]
        struct Row {
            #[serde(with = "datetime")]
            at: NaiveDateTime,
            #[serde(default, with = "option_date")]
            due: Option<NaiveDate>,
            #[serde(deserialize_with = "decimal::deserialize")]
            qty: f64,
        }

        let row: Row = serde_json::from_value(serde_json::json!({
            "at": "2024-03-01T06:00:00",
            "due": "",
            "qty": "12.50"
        }))
        .unwrap();
        assert_eq!(row.due, None);
        assert_eq!(row.qty, 12.5);

        let out = serde_json::to_value(&row).unwrap();
        assert_eq!(out["at"], "2024-03-01 06:00:00");
        assert_eq!(out["due"], serde_json::Value::Null);
    }
}
