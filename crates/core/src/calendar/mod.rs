mod error;
mod recurrence;
mod requests;
mod types;

pub use error::EventError;
pub use recurrence::{build_event_attributes, build_occurrences, MAX_OCCURRENCES};
pub use requests::EventInput;
pub use types::{
    CalendarEvent, EventAttributes, Frequency, Occurrence, OccurrenceRange, RepeatEnd, RepeatRule,
};
