use uuid::Uuid;

/// Prefix of every single-event cache key.
pub const EVENT_KEY_PREFIX: &str = "calendar_event_";

/// Cache key holding the map of every event.
///
/// It does not start with [`EVENT_KEY_PREFIX`], so no event key can collide
/// with it.
pub const ALL_EVENTS_KEY: &str = "all_calendar_events";

/// Returns the cache key for a single event.
pub fn event_key(event_id: Uuid) -> String {
    format!("{EVENT_KEY_PREFIX}{event_id}")
}
