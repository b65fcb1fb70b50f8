//! Recurrence expansion.
//!
//! Pure functions turning caller input into the persisted event shape and
//! into the concrete list of occurrence ranges its repeat rule describes.

use chrono::{Months, NaiveDateTime, TimeDelta};

use super::error::EventError;
use super::requests::EventInput;
use super::types::{EventAttributes, Frequency, OccurrenceRange, RepeatEnd, RepeatRule};

/// Upper bound on the number of occurrences a single event may expand to.
pub const MAX_OCCURRENCES: usize = 1000;

const MAX_TITLE_LEN: usize = 200;

/// Validates caller input and projects it into the persisted event shape.
///
/// The title is trimmed and blank optional text fields become `None`.
pub fn build_event_attributes(input: &EventInput) -> Result<EventAttributes, EventError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(EventError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(EventError::TitleTooLong);
    }

    validate_schedule(input.start, input.end, &input.repeat)?;

    Ok(EventAttributes {
        title: title.to_string(),
        description: non_blank(input.description.as_deref()),
        location: non_blank(input.location.as_deref()),
        start: input.start,
        end: input.end,
        repeat: input.repeat.clone(),
    })
}

/// Expands the input's repeat rule into concrete occurrence ranges.
///
/// The result is sorted ascending, free of duplicates, and every range has
/// the same duration as the base `[start, end)` range.
pub fn build_occurrences(input: &EventInput) -> Result<Vec<OccurrenceRange>, EventError> {
    validate_schedule(input.start, input.end, &input.repeat)?;
    expand(input.start, input.end, &input.repeat)
}

fn validate_schedule(
    start: NaiveDateTime,
    end: NaiveDateTime,
    repeat: &RepeatRule,
) -> Result<(), EventError> {
    OccurrenceRange::new(start, end)?;

    if let RepeatRule::Every {
        interval,
        end: bound,
        ..
    } = repeat
    {
        if *interval == 0 {
            return Err(EventError::InvalidInterval);
        }
        match bound {
            RepeatEnd::Count(0) => return Err(EventError::InvalidCount),
            RepeatEnd::Until(until) if *until < start => return Err(EventError::InvalidUntil),
            _ => {}
        }
    }

    Ok(())
}

fn expand(
    start: NaiveDateTime,
    end: NaiveDateTime,
    repeat: &RepeatRule,
) -> Result<Vec<OccurrenceRange>, EventError> {
    let base = OccurrenceRange::new(start, end)?;

    let mut ranges = match repeat {
        RepeatRule::Never => vec![base],
        RepeatRule::Every {
            frequency,
            interval,
            end,
        } => expand_every(base, *frequency, *interval, *end)?,
        RepeatRule::Custom { starts } => {
            if starts.len() >= MAX_OCCURRENCES {
                return Err(EventError::TooManyOccurrences(MAX_OCCURRENCES));
            }
            let mut ranges = Vec::with_capacity(starts.len() + 1);
            ranges.push(base);
            for start in starts {
                ranges.push(with_duration(*start, base.duration())?);
            }
            ranges
        }
    };

    ranges.sort();
    ranges.dedup();
    Ok(ranges)
}

fn expand_every(
    base: OccurrenceRange,
    frequency: Frequency,
    interval: u32,
    bound: RepeatEnd,
) -> Result<Vec<OccurrenceRange>, EventError> {
    let duration = base.duration();
    let mut ranges = Vec::new();

    for step in 0u32.. {
        if let RepeatEnd::Count(count) = bound {
            if step >= count {
                break;
            }
        }

        // Each start is computed from the base so month clamping never drifts.
        let start = nth_start(base.start, frequency, interval, step)?;

        if let RepeatEnd::Until(until) = bound {
            if start > until {
                break;
            }
        }
        if ranges.len() == MAX_OCCURRENCES {
            return Err(EventError::TooManyOccurrences(MAX_OCCURRENCES));
        }

        ranges.push(with_duration(start, duration)?);
    }

    Ok(ranges)
}

fn nth_start(
    base: NaiveDateTime,
    frequency: Frequency,
    interval: u32,
    step: u32,
) -> Result<NaiveDateTime, EventError> {
    let units = u64::from(interval) * u64::from(step);

    let shifted = match frequency {
        Frequency::Daily => i64::try_from(units)
            .ok()
            .and_then(TimeDelta::try_days)
            .and_then(|delta| base.checked_add_signed(delta)),
        Frequency::Weekly => i64::try_from(units)
            .ok()
            .and_then(TimeDelta::try_weeks)
            .and_then(|delta| base.checked_add_signed(delta)),
        Frequency::Monthly => add_months(base, Some(units)),
        Frequency::Yearly => add_months(base, units.checked_mul(12)),
    };

    shifted.ok_or(EventError::DateOutOfRange)
}

fn add_months(base: NaiveDateTime, months: Option<u64>) -> Option<NaiveDateTime> {
    let months = u32::try_from(months?).ok()?;
    base.checked_add_months(Months::new(months))
}

fn with_duration(start: NaiveDateTime, duration: TimeDelta) -> Result<OccurrenceRange, EventError> {
    let end = start
        .checked_add_signed(duration)
        .ok_or(EventError::DateOutOfRange)?;
    OccurrenceRange::new(start, end)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
