use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::EventError;

/// How often a repeating event recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// The bound that stops a repeating event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatEnd {
    /// Total number of occurrences, including the first one.
    Count(u32),
    /// Last allowed occurrence start (inclusive).
    Until(NaiveDateTime),
}

/// The repeat rule attached to an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RepeatRule {
    /// The event happens exactly once.
    #[default]
    Never,
    /// The event repeats every `interval` units of `frequency` until `end`.
    Every {
        frequency: Frequency,
        #[serde(default = "default_interval")]
        interval: u32,
        end: RepeatEnd,
    },
    /// The event happens at its base start plus each of the listed starts.
    Custom { starts: Vec<NaiveDateTime> },
}

fn default_interval() -> u32 {
    1
}

/// Normalized scheduling attributes, exactly as they are persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttributes {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    #[serde(default)]
    pub repeat: RepeatRule,
}

impl EventAttributes {
    /// Duration of the base range (and of every occurrence).
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// A concrete `[start, end)` range produced by recurrence expansion.
///
/// Ranges are built before the owning event has an id, and turned into
/// [`Occurrence`] values once it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OccurrenceRange {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl OccurrenceRange {
    /// Creates a new range, validating that start < end.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, EventError> {
        if end <= start {
            return Err(EventError::InvalidTimeRange);
        }
        Ok(Self { start, end })
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// One concrete instance of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// The event this occurrence belongs to.
    pub event_id: Uuid,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Occurrence {
    /// Attaches an expanded range to its owning event.
    pub fn new(event_id: Uuid, range: OccurrenceRange) -> Self {
        Self {
            event_id,
            start: range.start,
            end: range.end,
        }
    }

    /// Returns the `[start, end)` range of this occurrence.
    pub fn range(&self) -> OccurrenceRange {
        OccurrenceRange {
            start: self.start,
            end: self.end,
        }
    }
}

/// A calendar event with its occurrences attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub attributes: EventAttributes,
    /// Occurrences in ascending chronological order.
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
}

impl CalendarEvent {
    /// Creates an event without occurrences.
    pub fn new(id: Uuid, attributes: EventAttributes) -> Self {
        Self {
            id,
            attributes,
            occurrences: Vec::new(),
        }
    }

    /// Sets the occurrences for this event.
    pub fn with_occurrences(mut self, occurrences: Vec<Occurrence>) -> Self {
        self.occurrences = occurrences;
        self
    }

    /// Returns the ranges of all attached occurrences.
    pub fn occurrence_ranges(&self) -> Vec<OccurrenceRange> {
        self.occurrences.iter().map(Occurrence::range).collect()
    }
}
