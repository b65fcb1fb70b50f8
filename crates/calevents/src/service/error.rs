use thiserror::Error;

use calevents_core::calendar::EventError;
use calevents_core::storage::RepositoryError;

/// Errors surfaced by [`EventService`](super::EventService).
///
/// Cache failures never appear here; the cache is fail-open.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The event input was rejected before touching the store.
    #[error(transparent)]
    Validation(#[from] EventError),

    /// The requested event does not exist.
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// The event store failed.
    #[error("persistence error: {0}")]
    Persistence(RepositoryError),
}

impl ServiceError {
    pub(crate) fn event_not_found(id: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "CalendarEvent",
            id: id.to_string(),
        }
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound { entity_type, id },
            other => Self::Persistence(other),
        }
    }
}

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_transparent() {
        let err = ServiceError::from(EventError::EmptyTitle);
        assert_eq!(err.to_string(), EventError::EmptyTitle.to_string());
    }

    #[test]
    fn test_repository_not_found_maps_to_not_found() {
        let err = ServiceError::from(RepositoryError::NotFound {
            entity_type: "CalendarEvent",
            id: "abc".to_string(),
        });

        assert_eq!(err, ServiceError::event_not_found("abc"));
        assert_eq!(err.to_string(), "CalendarEvent not found: abc");
    }

    #[test]
    fn test_other_repository_errors_map_to_persistence() {
        let err = ServiceError::from(RepositoryError::QueryFailed("disk full".to_string()));

        assert!(matches!(
            err,
            ServiceError::Persistence(RepositoryError::QueryFailed(_))
        ));
        assert_eq!(err.to_string(), "persistence error: Query failed: disk full");
    }
}
