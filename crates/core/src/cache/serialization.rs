//! Pure functions for serializing/deserializing cached values to/from bytes.
//!
//! Values are stored as JSON so cache contents stay human-readable and easy
//! to inspect from `redis-cli`.

use std::collections::BTreeMap;

use thiserror::Error;
use uuid::Uuid;

use crate::calendar::CalendarEvent;

/// The all-events cache value: every event keyed by its ID.
pub type EventMap = BTreeMap<Uuid, CalendarEvent>;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes an event (with its occurrences) to JSON bytes.
pub fn serialize_event(event: &CalendarEvent) -> Result<Vec<u8>> {
    serde_json::to_vec(event).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to an event.
pub fn deserialize_event(bytes: &[u8]) -> Result<CalendarEvent> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes the all-events map to a JSON object keyed by event ID.
pub fn serialize_event_map(events: &EventMap) -> Result<Vec<u8>> {
    serde_json::to_vec(events).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to the all-events map.
pub fn deserialize_event_map(bytes: &[u8]) -> Result<EventMap> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{
        EventAttributes, Frequency, Occurrence, OccurrenceRange, RepeatEnd, RepeatRule,
    };
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn test_event_id() -> Uuid {
        Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").unwrap()
    }

    fn test_event() -> CalendarEvent {
        let id = test_event_id();
        let attributes = EventAttributes {
            title: "Review".to_string(),
            description: Some("Weekly review".to_string()),
            location: None,
            start: at(1, 9),
            end: at(1, 10),
            repeat: RepeatRule::Every {
                frequency: Frequency::Weekly,
                interval: 1,
                end: RepeatEnd::Count(2),
            },
        };
        let occurrences = vec![
            Occurrence::new(id, OccurrenceRange::new(at(1, 9), at(1, 10)).unwrap()),
            Occurrence::new(id, OccurrenceRange::new(at(8, 9), at(8, 10)).unwrap()),
        ];
        CalendarEvent::new(id, attributes).with_occurrences(occurrences)
    }

    #[test]
    fn test_event_keeps_occurrences() {
        let event = test_event();

        let bytes = serialize_event(&event).expect("serialize should succeed");
        let restored = deserialize_event(&bytes).expect("deserialize should succeed");

        assert_eq!(restored, event);
        assert_eq!(restored.occurrences.len(), 2);
    }

    #[test]
    fn test_event_map_is_a_json_object_keyed_by_id() {
        let event = test_event();
        let mut events = EventMap::new();
        events.insert(event.id, event.clone());

        let bytes = serialize_event_map(&events).expect("serialize should succeed");
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json.get(test_event_id().to_string()).is_some());

        let restored = deserialize_event_map(&bytes).expect("deserialize should succeed");
        assert_eq!(restored.get(&event.id), Some(&event));
    }

    #[test]
    fn test_empty_event_map() {
        let bytes = serialize_event_map(&EventMap::new()).expect("serialize should succeed");

        assert_eq!(bytes, b"{}");
        assert!(deserialize_event_map(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_deserialize_event_malformed_bytes() {
        let result = deserialize_event(b"not valid json");

        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }

    #[test]
    fn test_deserialize_event_map_wrong_shape() {
        let result = deserialize_event_map(b"[1, 2, 3]");

        assert!(matches!(
            result,
            Err(SerializationError::DeserializeFailed(_))
        ));
    }
}
