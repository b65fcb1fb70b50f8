//! Recurring calendar events served through a write-through cache.
//!
//! The pure parts (event model, recurrence expansion, cache keys and codecs,
//! collaborator traits) live in `calevents_core`. This crate provides the
//! storage and cache backends and the [`service::EventService`] that ties
//! them together.

pub mod cache;
pub mod config;
pub mod service;
pub mod storage;
