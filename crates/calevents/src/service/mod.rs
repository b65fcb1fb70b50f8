//! Event service: orchestrates recurrence expansion, the event store and
//! the write-through cache.

mod cache;
mod error;
mod events;

pub use cache::EventCache;
pub use error::{Result, ServiceError};
pub use events::EventService;
