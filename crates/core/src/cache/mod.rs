mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{event_key, ALL_EVENTS_KEY, EVENT_KEY_PREFIX};
pub use serialization::{
    deserialize_event, deserialize_event_map, serialize_event, serialize_event_map, EventMap,
    SerializationError,
};
pub use traits::Cache;
