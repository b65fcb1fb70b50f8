//! Functional core for calevents.
//!
//! Pure domain types, recurrence expansion, and the collaborator traits the
//! imperative shell implements. Nothing in this crate performs I/O.

pub mod cache;
pub mod calendar;
pub mod storage;
