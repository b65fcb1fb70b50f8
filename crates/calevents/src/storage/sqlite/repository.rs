//! SQLite repository implementation.
//!
//! Implements the repository traits from `calevents_core::storage` using SQLite.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use calevents_core::calendar::{CalendarEvent, EventAttributes, Occurrence};
use calevents_core::storage::{EventRepository, OccurrenceRepository, RepositoryError, Result};

use super::conversions::{format_datetime, repeat_rule_to_json, row_to_event, row_to_occurrence};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Owned column values for an events row, ready to move into a connection closure.
struct EventParams {
    title: String,
    description: Option<String>,
    location: Option<String>,
    start: String,
    end: String,
    repeat_json: String,
}

impl EventParams {
    fn from_attributes(attributes: &EventAttributes) -> Result<Self> {
        Ok(Self {
            title: attributes.title.clone(),
            description: attributes.description.clone(),
            location: attributes.location.clone(),
            start: format_datetime(&attributes.start),
            end: format_datetime(&attributes.end),
            repeat_json: repeat_rule_to_json(&attributes.repeat)?,
        })
    }
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for events and their occurrences.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Creates a new repository with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_schema(&conn).await?;

        Ok(Self { conn })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::ENABLE_FOREIGN_KEYS)
                .map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

// ============================================================================
// EventRepository implementation
// ============================================================================

#[async_trait]
impl EventRepository for SqliteRepository {
    async fn create_event(&self, attributes: &EventAttributes) -> Result<CalendarEvent> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();
        let params = EventParams::from_attributes(attributes)?;

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_EVENT,
                    rusqlite::params![
                        id_str,
                        params.title,
                        params.description,
                        params.location,
                        params.start,
                        params.end,
                        params.repeat_json,
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CalendarEvent", id.to_string()))?;

        Ok(CalendarEvent::new(id, attributes.clone()))
    }

    async fn get_event(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_EVENT_BY_ID).map_err(wrap_err)?;
                let (event_id, attributes) = match stmt.query_row([&id_str], row_to_event) {
                    Ok(row) => row,
                    Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                    Err(e) => return Err(wrap_err(e)),
                };

                let mut stmt = conn
                    .prepare(schema::SELECT_OCCURRENCES_BY_EVENT)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&id_str], row_to_occurrence)
                    .map_err(wrap_err)?;

                let mut occurrences = Vec::new();
                for row_result in rows {
                    occurrences.push(row_result.map_err(wrap_err)?);
                }

                Ok(Some(
                    CalendarEvent::new(event_id, attributes).with_occurrences(occurrences),
                ))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CalendarEvent", id.to_string()))
    }

    async fn get_all_events(&self) -> Result<Vec<CalendarEvent>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn.prepare(schema::SELECT_ALL_OCCURRENCES).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_occurrence).map_err(wrap_err)?;

                let mut by_event: HashMap<Uuid, Vec<Occurrence>> = HashMap::new();
                for row_result in rows {
                    let occurrence = row_result.map_err(wrap_err)?;
                    by_event
                        .entry(occurrence.event_id)
                        .or_default()
                        .push(occurrence);
                }

                let mut stmt = conn.prepare(schema::SELECT_ALL_EVENTS).map_err(wrap_err)?;
                let rows = stmt.query_map([], row_to_event).map_err(wrap_err)?;

                let mut events = Vec::new();
                for row_result in rows {
                    let (id, attributes) = row_result.map_err(wrap_err)?;
                    let occurrences = by_event.remove(&id).unwrap_or_default();
                    events.push(CalendarEvent::new(id, attributes).with_occurrences(occurrences));
                }
                Ok(events)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "CalendarEvent"))
    }

    async fn update_event(&self, id: Uuid, attributes: &EventAttributes) -> Result<u64> {
        let id_str = id.to_string();
        let params = EventParams::from_attributes(attributes)?;

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_EVENT,
                        rusqlite::params![
                            id_str,
                            params.title,
                            params.description,
                            params.location,
                            params.start,
                            params.end,
                            params.repeat_json,
                        ],
                    )
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CalendarEvent", id.to_string()))
    }

    async fn delete_event(&self, id: Uuid) -> Result<u64> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_EVENT, [&id_str])
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "CalendarEvent", id.to_string()))
    }
}

// ============================================================================
// OccurrenceRepository implementation
// ============================================================================

#[async_trait]
impl OccurrenceRepository for SqliteRepository {
    async fn create_occurrence(&self, occurrence: &Occurrence) -> Result<()> {
        let event_id = occurrence.event_id.to_string();
        let start = format_datetime(&occurrence.start);
        let end = format_datetime(&occurrence.end);

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_OCCURRENCE,
                    rusqlite::params![event_id, start, end],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Occurrence"))
    }

    async fn delete_occurrences_by_event(&self, event_id: Uuid) -> Result<u64> {
        let event_id_str = event_id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_OCCURRENCES_BY_EVENT, [&event_id_str])
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Occurrence", event_id.to_string()))
    }
}
