//! Typed, fail-open view over a byte cache.
//!
//! Backend errors and undecodable values are logged and reported as misses.
//! Failed writes are logged and swallowed, so an unavailable cache never
//! fails a service operation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use calevents_core::cache::{
    deserialize_event, deserialize_event_map, event_key, serialize_event, serialize_event_map,
    Cache, EventMap, ALL_EVENTS_KEY,
};
use calevents_core::calendar::CalendarEvent;

/// Event-aware cache facade used by [`EventService`](super::EventService).
pub struct EventCache<C: Cache> {
    cache: Arc<C>,
    ttl_millis: AtomicU64,
}

fn to_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX)
}

impl<C: Cache> EventCache<C> {
    pub fn new(cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            cache,
            ttl_millis: AtomicU64::new(to_millis(ttl)),
        }
    }

    /// TTL applied to subsequent writes.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_millis.load(Ordering::Relaxed))
    }

    /// Changes the TTL for subsequent writes. Existing entries keep theirs.
    pub fn set_ttl(&self, ttl: Duration) {
        self.ttl_millis.store(to_millis(ttl), Ordering::Relaxed);
    }

    pub async fn get_event(&self, id: Uuid) -> Option<CalendarEvent> {
        let bytes = self.get_bytes(&event_key(id)).await?;
        match deserialize_event(&bytes) {
            Ok(event) => Some(event),
            Err(err) => {
                tracing::warn!(event_id = %id, error = %err, "Cached event deserialization failed");
                None
            }
        }
    }

    pub async fn put_event(&self, event: &CalendarEvent) {
        match serialize_event(event) {
            Ok(bytes) => self.set_bytes(&event_key(event.id), &bytes).await,
            Err(err) => {
                tracing::warn!(event_id = %event.id, error = %err, "Failed to serialize event")
            }
        }
    }

    pub async fn remove_event(&self, id: Uuid) {
        if let Err(err) = self.cache.delete(&event_key(id)).await {
            tracing::warn!(event_id = %id, error = %err, "Failed to evict cached event");
        }
    }

    pub async fn get_all_events(&self) -> Option<EventMap> {
        let bytes = self.get_bytes(ALL_EVENTS_KEY).await?;
        match deserialize_event_map(&bytes) {
            Ok(events) => Some(events),
            Err(err) => {
                tracing::warn!(error = %err, "Cached event map deserialization failed");
                None
            }
        }
    }

    pub async fn put_all_events(&self, events: &EventMap) {
        match serialize_event_map(events) {
            Ok(bytes) => self.set_bytes(ALL_EVENTS_KEY, &bytes).await,
            Err(err) => tracing::warn!(error = %err, "Failed to serialize event map"),
        }
    }

    async fn get_bytes(&self, key: &str) -> Option<Vec<u8>> {
        match self.cache.get(key).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn set_bytes(&self, key: &str, bytes: &[u8]) {
        if let Err(err) = self.cache.set(key, bytes, Some(self.ttl())).await {
            tracing::warn!(key, error = %err, "Cache write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calevents_core::cache::{CacheError, Result as CacheResult};
    use calevents_core::calendar::{EventAttributes, RepeatRule};
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use tokio::sync::RwLock;

    // Records the TTL of every write
    struct RecordingCache {
        store: RwLock<HashMap<String, Vec<u8>>>,
        ttls: RwLock<Vec<Option<Duration>>>,
    }

    impl RecordingCache {
        fn new() -> Self {
            Self {
                store: RwLock::new(HashMap::new()),
                ttls: RwLock::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Cache for RecordingCache {
        async fn has(&self, key: &str) -> CacheResult<bool> {
            Ok(self.store.read().await.contains_key(key))
        }

        async fn get(&self, key: &str) -> CacheResult<Option<Vec<u8>>> {
            Ok(self.store.read().await.get(key).cloned())
        }

        async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> CacheResult<()> {
            self.ttls.write().await.push(ttl);
            self.store
                .write()
                .await
                .insert(key.to_string(), value.to_vec());
            Ok(())
        }

        async fn delete(&self, key: &str) -> CacheResult<()> {
            self.store.write().await.remove(key);
            Ok(())
        }
    }

    // Every operation fails
    struct BrokenCache;

    #[async_trait]
    impl Cache for BrokenCache {
        async fn has(&self, _key: &str) -> CacheResult<bool> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn get(&self, _key: &str) -> CacheResult<Option<Vec<u8>>> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn set(&self, _key: &str, _value: &[u8], _ttl: Option<Duration>) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }

        async fn delete(&self, _key: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionFailed("down".to_string()))
        }
    }

    fn test_event() -> CalendarEvent {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let attributes = EventAttributes {
            title: "Planning".to_string(),
            description: None,
            location: None,
            start,
            end: start + chrono::TimeDelta::hours(1),
            repeat: RepeatRule::Never,
        };
        CalendarEvent::new(Uuid::new_v4(), attributes)
    }

    #[tokio::test]
    async fn test_put_and_get_event() {
        let backend = Arc::new(RecordingCache::new());
        let cache = EventCache::new(backend.clone(), Duration::from_secs(60));
        let event = test_event();

        assert!(cache.get_event(event.id).await.is_none());
        cache.put_event(&event).await;

        assert!(backend.has(&event_key(event.id)).await.unwrap());
        assert_eq!(cache.get_event(event.id).await, Some(event.clone()));

        cache.remove_event(event.id).await;
        assert!(!backend.has(&event_key(event.id)).await.unwrap());
        assert!(cache.get_event(event.id).await.is_none());
    }

    #[tokio::test]
    async fn test_put_and_get_all_events() {
        let backend = Arc::new(RecordingCache::new());
        let cache = EventCache::new(backend.clone(), Duration::from_secs(60));
        let event = test_event();
        let mut events = EventMap::new();
        events.insert(event.id, event);

        assert!(cache.get_all_events().await.is_none());
        cache.put_all_events(&events).await;

        assert!(backend.has(ALL_EVENTS_KEY).await.unwrap());
        assert_eq!(cache.get_all_events().await, Some(events));
    }

    #[tokio::test]
    async fn test_undecodable_value_is_a_miss() {
        let backend = Arc::new(RecordingCache::new());
        let cache = EventCache::new(backend.clone(), Duration::from_secs(60));
        let id = Uuid::new_v4();
        backend.set(&event_key(id), b"garbage", None).await.unwrap();
        backend.set(ALL_EVENTS_KEY, b"[]", None).await.unwrap();

        assert!(cache.get_event(id).await.is_none());
        assert!(cache.get_all_events().await.is_none());
    }

    #[tokio::test]
    async fn test_broken_backend_reads_as_miss() {
        let cache = EventCache::new(Arc::new(BrokenCache), Duration::from_secs(60));
        let event = test_event();

        cache.put_event(&event).await;
        cache.put_all_events(&EventMap::new()).await;
        cache.remove_event(event.id).await;

        assert!(cache.get_event(event.id).await.is_none());
        assert!(cache.get_all_events().await.is_none());
    }

    #[tokio::test]
    async fn test_ttl_change_applies_to_later_writes() {
        let backend = Arc::new(RecordingCache::new());
        let cache = EventCache::new(backend.clone(), Duration::from_secs(600));
        let event = test_event();

        cache.put_event(&event).await;
        cache.set_ttl(Duration::from_secs(30));
        cache.put_event(&event).await;

        assert_eq!(cache.ttl(), Duration::from_secs(30));
        assert_eq!(
            *backend.ttls.read().await,
            vec![
                Some(Duration::from_secs(600)),
                Some(Duration::from_secs(30))
            ]
        );
    }
}
