//! Caller input types for event operations.
//!
//! These are the raw shapes a host application hands to the service. They
//! carry no guarantees; [`build_event_attributes`](super::build_event_attributes)
//! and [`build_occurrences`](super::build_occurrences) validate them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::types::{Frequency, RepeatEnd, RepeatRule};

/// Request payload for creating or replacing an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub repeat: RepeatRule,
}

impl EventInput {
    /// Create a non-repeating event request.
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            start,
            end,
            description: None,
            location: None,
            repeat: RepeatRule::Never,
        }
    }

    /// Set the event description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the event location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the repeat rule.
    pub fn with_repeat(mut self, repeat: RepeatRule) -> Self {
        self.repeat = repeat;
        self
    }

    /// Repeat every `interval` units of `frequency`, `count` times in total.
    pub fn repeat_count(self, frequency: Frequency, interval: u32, count: u32) -> Self {
        self.with_repeat(RepeatRule::Every {
            frequency,
            interval,
            end: RepeatEnd::Count(count),
        })
    }

    /// Repeat every `interval` units of `frequency` while starts are `<= until`.
    pub fn repeat_until(self, frequency: Frequency, interval: u32, until: NaiveDateTime) -> Self {
        self.with_repeat(RepeatRule::Every {
            frequency,
            interval,
            end: RepeatEnd::Until(until),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_event_input_builder() {
        let input = EventInput::new("Standup", at(9), at(10))
            .with_description("Daily sync")
            .with_location("Room 4")
            .repeat_count(Frequency::Daily, 1, 5);

        assert_eq!(input.title, "Standup");
        assert_eq!(input.description, Some("Daily sync".to_string()));
        assert_eq!(input.location, Some("Room 4".to_string()));
        assert_eq!(
            input.repeat,
            RepeatRule::Every {
                frequency: Frequency::Daily,
                interval: 1,
                end: RepeatEnd::Count(5),
            }
        );
    }

    #[test]
    fn test_event_input_defaults_to_never_repeat() {
        let input: EventInput = serde_json::from_str(
            r#"{"title":"Lunch","start":"2024-01-01T12:00:00","end":"2024-01-01T13:00:00"}"#,
        )
        .unwrap();

        assert_eq!(input.repeat, RepeatRule::Never);
        assert!(input.description.is_none());
        assert!(input.location.is_none());
    }
}
