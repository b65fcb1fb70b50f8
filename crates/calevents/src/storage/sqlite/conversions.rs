//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use calevents_core::calendar::{EventAttributes, Occurrence, RepeatRule};
use calevents_core::storage::RepositoryError;
use chrono::NaiveDateTime;
use rusqlite::Row;
use uuid::Uuid;

/// Storage format for wall-clock timestamps. Sorts lexicographically.
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Convert a SQLite row to an event ID and its attributes.
///
/// Expected columns: id, title, description, location, start_at, end_at, repeat_rule
pub fn row_to_event(row: &Row) -> rusqlite::Result<(Uuid, EventAttributes)> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let description: Option<String> = row.get(2)?;
    let location: Option<String> = row.get(3)?;
    let start: String = row.get(4)?;
    let end: String = row.get(5)?;
    let repeat_json: String = row.get(6)?;

    Ok((
        parse_uuid(&id)?,
        EventAttributes {
            title,
            description,
            location,
            start: parse_datetime(&start)?,
            end: parse_datetime(&end)?,
            repeat: json_to_repeat_rule(&repeat_json)?,
        },
    ))
}

/// Convert a SQLite row to an Occurrence.
///
/// Expected columns: event_id, start_at, end_at
pub fn row_to_occurrence(row: &Row) -> rusqlite::Result<Occurrence> {
    let event_id: String = row.get(0)?;
    let start: String = row.get(1)?;
    let end: String = row.get(2)?;

    Ok(Occurrence {
        event_id: parse_uuid(&event_id)?,
        start: parse_datetime(&start)?,
        end: parse_datetime(&end)?,
    })
}

/// Serialize a RepeatRule to JSON string.
pub fn repeat_rule_to_json(rule: &RepeatRule) -> Result<String, RepositoryError> {
    serde_json::to_string(rule).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

fn json_to_repeat_rule(json: &str) -> rusqlite::Result<RepeatRule> {
    serde_json::from_str(json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a UUID from string.
fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a wall-clock timestamp stored by [`format_datetime`].
fn parse_datetime(s: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FORMAT).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Format a NaiveDateTime for SQLite storage.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calevents_core::calendar::{Frequency, RepeatEnd};
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime(&at(9, 30)), "2024-01-01T09:30:00");
    }

    #[test]
    fn test_format_datetime_keeps_fractional_seconds() {
        let dt = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_milli_opt(9, 30, 0, 250)
            .unwrap();

        let formatted = format_datetime(&dt);

        assert_eq!(formatted, "2024-01-01T09:30:00.250");
        assert_eq!(parse_datetime(&formatted).unwrap(), dt);
    }

    #[test]
    fn test_formatted_datetimes_sort_chronologically() {
        assert!(format_datetime(&at(9, 0)) < format_datetime(&at(10, 0)));
    }

    #[test]
    fn test_parse_datetime_valid() {
        assert_eq!(parse_datetime("2024-01-01T09:30:00").unwrap(), at(9, 30));
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime("2024-01-01").is_err());
        assert!(parse_datetime("not a date").is_err());
    }

    #[test]
    fn test_parse_uuid_valid() {
        let uuid = Uuid::new_v4();
        assert_eq!(parse_uuid(&uuid.to_string()).unwrap(), uuid);
    }

    #[test]
    fn test_parse_uuid_invalid() {
        assert!(parse_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_repeat_rule_json() {
        let rule = RepeatRule::Every {
            frequency: Frequency::Monthly,
            interval: 2,
            end: RepeatEnd::Count(6),
        };

        let json = repeat_rule_to_json(&rule).unwrap();

        assert!(json.contains(r#""type":"every""#));
        assert_eq!(json_to_repeat_rule(&json).unwrap(), rule);
    }

    #[test]
    fn test_repeat_rule_never_json() {
        let json = repeat_rule_to_json(&RepeatRule::Never).unwrap();
        assert_eq!(json, r#"{"type":"never"}"#);
    }

    #[test]
    fn test_invalid_repeat_rule_json() {
        assert!(json_to_repeat_rule(r#"{"type":"sometimes"}"#).is_err());
    }
}
