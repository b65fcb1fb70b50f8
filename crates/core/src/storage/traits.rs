use async_trait::async_trait;
use uuid::Uuid;

use crate::calendar::{CalendarEvent, EventAttributes, Occurrence};

use super::Result;

/// Repository for event rows.
///
/// Reads always return events with their occurrences attached.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persists a new event and returns it with its store-assigned ID.
    async fn create_event(&self, attributes: &EventAttributes) -> Result<CalendarEvent>;

    /// Gets an event with its occurrences by ID.
    async fn get_event(&self, id: Uuid) -> Result<Option<CalendarEvent>>;

    /// Gets every event with its occurrences.
    async fn get_all_events(&self) -> Result<Vec<CalendarEvent>>;

    /// Overwrites the attributes of an event. Returns the number of rows updated.
    async fn update_event(&self, id: Uuid, attributes: &EventAttributes) -> Result<u64>;

    /// Deletes an event and its occurrences. Returns the number of events deleted.
    async fn delete_event(&self, id: Uuid) -> Result<u64>;
}

/// Repository for occurrence rows.
#[async_trait]
pub trait OccurrenceRepository: Send + Sync {
    /// Persists a single occurrence. Its event must already exist.
    async fn create_occurrence(&self, occurrence: &Occurrence) -> Result<()>;

    /// Deletes every occurrence of an event. Returns the number of rows deleted.
    async fn delete_occurrences_by_event(&self, event_id: Uuid) -> Result<u64>;
}

/// Combined trait for stores that hold both events and their occurrences.
pub trait EventStore: EventRepository + OccurrenceRepository {}

impl<T: EventRepository + OccurrenceRepository> EventStore for T {}
