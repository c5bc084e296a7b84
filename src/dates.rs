// 📅 Date Codec - canonical YYYY-MM-DD dates
//
// Dates live on disk as strings and are parsed only in memory. The codec is
// strict about shape: chrono alone would accept "2025-6-7", we do not.

use chrono::NaiveDate;

use crate::error::{PlannerError, Result};

/// Canonical on-disk date layout.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` string into a calendar date.
///
/// Fails with a format error when the string does not have exactly that
/// shape or names a day that does not exist (e.g. `2023-02-29`).
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    parse_field("date", raw)
}

/// Same as [`parse_date`], reporting errors against a named field.
pub fn parse_field(field: &str, raw: &str) -> Result<NaiveDate> {
    if !has_canonical_shape(raw) {
        return Err(PlannerError::format(field, raw, "expected YYYY-MM-DD"));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| PlannerError::format(field, raw, "no such calendar date"))
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn has_canonical_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Serde adapter so record fields of type `NaiveDate` round-trip through the codec.
pub mod iso_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_date() {
        let date = parse_date("2025-06-14").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
    }

    #[test]
    fn test_round_trip() {
        for raw in ["2024-02-29", "1999-12-31", "2030-01-01", "0001-01-01"] {
            assert_eq!(format_date(parse_date(raw).unwrap()), raw);
        }
    }

    #[test]
    fn test_rejects_wrong_shape() {
        for raw in ["2025-6-14", "14/06/2025", "2025-06-14T00:00", "", "2025_06_14", "20250614"] {
            let err = parse_date(raw).unwrap_err();
            assert!(err.is_format(), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_rejects_impossible_day() {
        let err = parse_date("2023-02-29").unwrap_err();
        assert!(err.to_string().contains("no such calendar date"));
        assert!(parse_date("2025-13-01").is_err());
        assert!(parse_date("2025-04-31").is_err());
    }

    #[test]
    fn test_parse_field_names_field() {
        let err = parse_field("wedding_date", "soon").unwrap_err();
        assert!(err.to_string().contains("wedding_date"));
    }

    #[test]
    fn test_serde_adapter() {
        #[derive(serde::Serialize, serde::Deserialize)]
        struct Holder {
            #[serde(with = "iso_date")]
            date: NaiveDate,
        }

        let holder: Holder = serde_json::from_str(r#"{"date":"2026-09-19"}"#).unwrap();
        assert_eq!(serde_json::to_string(&holder).unwrap(), r#"{"date":"2026-09-19"}"#);
        assert!(serde_json::from_str::<Holder>(r#"{"date":"Sept 19"}"#).is_err());
    }
}
