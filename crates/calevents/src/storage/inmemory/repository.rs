//! In-memory repository implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use calevents_core::calendar::{CalendarEvent, EventAttributes, Occurrence};
use calevents_core::storage::{EventRepository, OccurrenceRepository, RepositoryError, Result};

/// In-memory storage backend.
///
/// Uses HashMaps wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the repository is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    events: Arc<RwLock<HashMap<Uuid, EventAttributes>>>,
    occurrences: Arc<RwLock<HashMap<Uuid, Vec<Occurrence>>>>,
}

impl InMemoryRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Attaches the stored occurrences of an event in chronological order.
fn with_occurrences(
    id: Uuid,
    attributes: &EventAttributes,
    occurrences: &HashMap<Uuid, Vec<Occurrence>>,
) -> CalendarEvent {
    let mut attached = occurrences.get(&id).cloned().unwrap_or_default();
    attached.sort_by_key(|o| (o.start, o.end));
    CalendarEvent::new(id, attributes.clone()).with_occurrences(attached)
}

#[async_trait]
impl EventRepository for InMemoryRepository {
    async fn create_event(&self, attributes: &EventAttributes) -> Result<CalendarEvent> {
        let id = Uuid::new_v4();
        self.events.write().await.insert(id, attributes.clone());
        Ok(CalendarEvent::new(id, attributes.clone()))
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        let events = self.events.read().await;
        let occurrences = self.occurrences.read().await;
        Ok(events
            .get(&id)
            .map(|attributes| with_occurrences(id, attributes, &occurrences)))
    }

    async fn get_all_events(&self) -> Result<Vec<CalendarEvent>> {
        let events = self.events.read().await;
        let occurrences = self.occurrences.read().await;
        Ok(events
            .iter()
            .map(|(id, attributes)| with_occurrences(*id, attributes, &occurrences))
            .collect())
    }

    async fn update_event(&self, id: Uuid, attributes: &EventAttributes) -> Result<u64> {
        let mut events = self.events.write().await;
        match events.get_mut(&id) {
            Some(existing) => {
                *existing = attributes.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_event(&self, id: Uuid) -> Result<u64> {
        let mut events = self.events.write().await;
        if events.remove(&id).is_none() {
            return Ok(0);
        }
        self.occurrences.write().await.remove(&id);
        Ok(1)
    }
}

#[async_trait]
impl OccurrenceRepository for InMemoryRepository {
    async fn create_occurrence(&self, occurrence: &Occurrence) -> Result<()> {
        // Mirror the foreign key constraint of a relational store.
        if !self.events.read().await.contains_key(&occurrence.event_id) {
            return Err(RepositoryError::InvalidData(format!(
                "Occurrence references unknown event {}",
                occurrence.event_id
            )));
        }
        self.occurrences
            .write()
            .await
            .entry(occurrence.event_id)
            .or_default()
            .push(*occurrence);
        Ok(())
    }

    async fn delete_occurrences_by_event(&self, event_id: Uuid) -> Result<u64> {
        let removed = self.occurrences.write().await.remove(&event_id);
        Ok(removed.map_or(0, |o| o.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calevents_core::calendar::{OccurrenceRange, RepeatRule};
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn attributes(title: &str) -> EventAttributes {
        EventAttributes {
            title: title.to_string(),
            description: None,
            location: None,
            start: at(1, 9),
            end: at(1, 10),
            repeat: RepeatRule::Never,
        }
    }

    fn occurrence(event_id: Uuid, day: u32) -> Occurrence {
        Occurrence::new(
            event_id,
            OccurrenceRange::new(at(day, 9), at(day, 10)).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_distinct_ids() {
        let repo = InMemoryRepository::new();

        let first = repo.create_event(&attributes("First")).await.unwrap();
        let second = repo.create_event(&attributes("Second")).await.unwrap();

        assert_ne!(first.id, second.id);
        assert!(first.occurrences.is_empty());
        assert_eq!(first.attributes.title, "First");
    }

    #[tokio::test]
    async fn test_get_event_attaches_sorted_occurrences() {
        let repo = InMemoryRepository::new();
        let event = repo.create_event(&attributes("Event")).await.unwrap();

        repo.create_occurrence(&occurrence(event.id, 8)).await.unwrap();
        repo.create_occurrence(&occurrence(event.id, 1)).await.unwrap();

        let fetched = repo.get_event(event.id).await.unwrap().unwrap();
        let days: Vec<_> = fetched.occurrences.iter().map(|o| o.start).collect();
        assert_eq!(days, vec![at(1, 9), at(8, 9)]);
    }

    #[tokio::test]
    async fn test_get_missing_event() {
        let repo = InMemoryRepository::new();

        assert!(repo.get_event(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_counts_rows() {
        let repo = InMemoryRepository::new();
        let event = repo.create_event(&attributes("Before")).await.unwrap();

        assert_eq!(
            repo.update_event(event.id, &attributes("After")).await.unwrap(),
            1
        );
        assert_eq!(
            repo.update_event(Uuid::new_v4(), &attributes("Nope"))
                .await
                .unwrap(),
            0
        );

        let fetched = repo.get_event(event.id).await.unwrap().unwrap();
        assert_eq!(fetched.attributes.title, "After");
    }

    #[tokio::test]
    async fn test_delete_cascades_occurrences() {
        let repo = InMemoryRepository::new();
        let event = repo.create_event(&attributes("Event")).await.unwrap();
        repo.create_occurrence(&occurrence(event.id, 1)).await.unwrap();

        assert_eq!(repo.delete_event(event.id).await.unwrap(), 1);
        assert_eq!(repo.delete_event(event.id).await.unwrap(), 0);
        assert_eq!(repo.delete_occurrences_by_event(event.id).await.unwrap(), 0);
        assert!(repo.get_all_events().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_occurrence_requires_existing_event() {
        let repo = InMemoryRepository::new();

        let result = repo.create_occurrence(&occurrence(Uuid::new_v4(), 1)).await;

        assert!(matches!(result, Err(RepositoryError::InvalidData(_))));
    }

    #[tokio::test]
    async fn test_delete_occurrences_by_event() {
        let repo = InMemoryRepository::new();
        let event = repo.create_event(&attributes("Event")).await.unwrap();
        repo.create_occurrence(&occurrence(event.id, 1)).await.unwrap();
        repo.create_occurrence(&occurrence(event.id, 2)).await.unwrap();

        assert_eq!(repo.delete_occurrences_by_event(event.id).await.unwrap(), 2);

        let fetched = repo.get_event(event.id).await.unwrap().unwrap();
        assert!(fetched.occurrences.is_empty());
    }
}
