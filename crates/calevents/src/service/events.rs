//! Event orchestration over a store and a write-through cache.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use calevents_core::cache::{Cache, EventMap};
use calevents_core::calendar::{
    build_event_attributes, build_occurrences, CalendarEvent, EventInput, Occurrence,
    OccurrenceRange,
};
use calevents_core::storage::EventStore;

use super::cache::EventCache;
use super::error::{Result, ServiceError};

/// Creates, reads, updates and deletes calendar events.
///
/// Writes go to the store first and then overwrite both cache entries:
/// the single event under `calendar_event_<id>` and the map of every event
/// under `all_calendar_events`. Reads are served from the cache when
/// possible and fill it on a miss.
///
/// # Type Parameters
///
/// * `R` - The event and occurrence store
/// * `C` - The cache backend
pub struct EventService<R, C>
where
    R: EventStore,
    C: Cache,
{
    store: Arc<R>,
    cache: EventCache<C>,
}

impl<R, C> EventService<R, C>
where
    R: EventStore,
    C: Cache,
{
    /// Creates a new event service.
    ///
    /// # Arguments
    ///
    /// * `store` - Persistent store for events and occurrences
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cache writes
    pub fn new(store: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            store,
            cache: EventCache::new(cache, ttl),
        }
    }

    /// TTL applied to cache writes.
    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl()
    }

    /// Changes the TTL for subsequent cache writes.
    pub fn set_cache_ttl(&self, ttl: Duration) {
        self.cache.set_ttl(ttl);
    }

    /// Validates and persists a new event with its expanded occurrences.
    pub async fn create_event(&self, input: &EventInput) -> Result<CalendarEvent> {
        let attributes = build_event_attributes(input)?;
        let ranges = build_occurrences(input)?;

        let created = self.store.create_event(&attributes).await?;
        let occurrences = self.persist_occurrences(created.id, &ranges).await?;
        let event = created.with_occurrences(occurrences);

        self.cache.put_event(&event).await;
        self.upsert_in_all_events(&event).await?;

        tracing::debug!(
            event_id = %event.id,
            occurrences = event.occurrences.len(),
            "Created event"
        );
        Ok(event)
    }

    /// Returns one event with its occurrences.
    pub async fn get_event(&self, id: Uuid) -> Result<CalendarEvent> {
        if let Some(event) = self.cache.get_event(id).await {
            tracing::trace!(event_id = %id, "Cache hit for event");
            return Ok(event);
        }

        tracing::trace!(event_id = %id, "Cache miss for event");
        let event = self
            .store
            .get_event(id)
            .await?
            .ok_or_else(|| ServiceError::event_not_found(id))?;

        self.cache.put_event(&event).await;
        Ok(event)
    }

    /// Returns every event keyed by its ID.
    pub async fn get_all_events(&self) -> Result<EventMap> {
        if let Some(events) = self.cache.get_all_events().await {
            tracing::trace!(count = events.len(), "Cache hit for all events");
            return Ok(events);
        }

        tracing::trace!("Cache miss for all events");
        let events: EventMap = self
            .store
            .get_all_events()
            .await?
            .into_iter()
            .map(|event| (event.id, event))
            .collect();

        self.cache.put_all_events(&events).await;
        Ok(events)
    }

    /// Replaces an event's attributes and regenerates its occurrences.
    pub async fn update_event(&self, id: Uuid, input: &EventInput) -> Result<CalendarEvent> {
        let attributes = build_event_attributes(input)?;
        let ranges = build_occurrences(input)?;

        self.store.delete_occurrences_by_event(id).await?;
        self.store.update_event(id, &attributes).await?;
        let updated = self
            .store
            .get_event(id)
            .await?
            .ok_or_else(|| ServiceError::event_not_found(id))?;

        let occurrences = self.persist_occurrences(id, &ranges).await?;
        let event = updated.with_occurrences(occurrences);

        self.cache.put_event(&event).await;
        self.upsert_in_all_events(&event).await?;

        tracing::debug!(
            event_id = %id,
            occurrences = event.occurrences.len(),
            "Updated event"
        );
        Ok(event)
    }

    /// Deletes an event and its occurrences.
    pub async fn delete_event(&self, id: Uuid) -> Result<()> {
        if self.store.delete_event(id).await? == 0 {
            return Err(ServiceError::event_not_found(id));
        }

        self.cache.remove_event(id).await;
        let mut events = self.get_all_events().await?;
        events.remove(&id);
        self.cache.put_all_events(&events).await;

        tracing::debug!(event_id = %id, "Deleted event");
        Ok(())
    }

    async fn persist_occurrences(
        &self,
        event_id: Uuid,
        ranges: &[OccurrenceRange],
    ) -> Result<Vec<Occurrence>> {
        let mut occurrences = Vec::with_capacity(ranges.len());
        for range in ranges {
            let occurrence = Occurrence::new(event_id, *range);
            self.store.create_occurrence(&occurrence).await?;
            occurrences.push(occurrence);
        }
        Ok(occurrences)
    }

    async fn upsert_in_all_events(&self, event: &CalendarEvent) -> Result<()> {
        let mut events = self.get_all_events().await?;
        events.insert(event.id, event.clone());
        self.cache.put_all_events(&events).await;
        Ok(())
    }
}
