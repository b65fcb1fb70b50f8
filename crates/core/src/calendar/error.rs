use thiserror::Error;

/// Errors that can occur when validating event input or expanding its
/// repeat rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EventError {
    #[error("Event title cannot be empty")]
    EmptyTitle,
    #[error("Event title too long (max 200 characters)")]
    TitleTooLong,
    #[error("End must be after start")]
    InvalidTimeRange,
    #[error("Repeat interval must be at least 1")]
    InvalidInterval,
    #[error("Repeat count must be at least 1")]
    InvalidCount,
    #[error("Repeat end date must not be before the event start")]
    InvalidUntil,
    #[error("Repeat rule produces more than {0} occurrences")]
    TooManyOccurrences(usize),
    #[error("Occurrence date out of range")]
    DateOutOfRange,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_error_display() {
        assert_eq!(
            EventError::EmptyTitle.to_string(),
            "Event title cannot be empty"
        );
        assert_eq!(
            EventError::InvalidTimeRange.to_string(),
            "End must be after start"
        );
        assert_eq!(
            EventError::TooManyOccurrences(1000).to_string(),
            "Repeat rule produces more than 1000 occurrences"
        );
    }
}
