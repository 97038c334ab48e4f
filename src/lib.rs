//! # Skyrecords - Aviation Reference Data Engine
//!
//! Event-driven data-access engine for a small record-management application.
//!
//! Skyrecords provides:
//! - Typed records for continents, countries and regions
//! - A generic SQLite table handler keyed by static table schemas
//! - Exact-match search cursors, load by id, create and update with
//!   foreign-key checks
//! - An [`Engine`] that turns inbound [`Event`]s into outbound [`Response`]s

pub mod record;
pub mod storage;
pub mod event;
pub mod engine;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use record::{Continent, Country, EntityKind, Region};
pub use storage::{Database, Entity, SearchFilter, Table};
pub use event::{Event, Response};
pub use engine::Engine;

/// Result type alias for Skyrecords operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Skyrecords operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database could not be opened: {0}")]
    OpenFailed(String),

    #[error("No database is open")]
    DatabaseNotOpen,

    #[error("Invalid search: specify at least one of {0}")]
    InvalidQuery(String),

    #[error("{entity} {id} could not be loaded")]
    LoadFailed { entity: &'static str, id: i64 },

    #[error("The {table} table is unavailable")]
    TableUnavailable { table: &'static str },

    #[error("{reference} matching id {} does not exist", display_id(.id))]
    ReferenceNotFound { reference: &'static str, id: Option<i64> },

    #[error("No {entity} exists with id {}", display_id(.id))]
    RecordNotFound { entity: &'static str, id: Option<i64> },

    #[error("Duplicate {entity} info: {reason}")]
    DuplicateRecord { entity: &'static str, reason: String },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    /// Whether this error belongs on the generic application error channel
    /// rather than an operation-specific failure event.
    pub fn is_unexpected(&self) -> bool {
        matches!(
            self,
            Error::DatabaseNotOpen | Error::InvalidQuery(_) | Error::Unexpected(_)
        )
    }
}

fn display_id(id: &Option<i64>) -> String {
    id.map_or_else(|| "<none>".to_string(), |id| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_channels() {
        assert!(Error::DatabaseNotOpen.is_unexpected());
        assert!(Error::InvalidQuery("name, code".into()).is_unexpected());
        assert!(!Error::LoadFailed { entity: "continent", id: 3 }.is_unexpected());
        assert!(!Error::TableUnavailable { table: "region" }.is_unexpected());
    }

    #[test]
    fn test_reference_message_names_reference() {
        let err = Error::ReferenceNotFound { reference: "continent", id: Some(9) };
        assert_eq!(err.to_string(), "continent matching id 9 does not exist");

        let err = Error::RecordNotFound { entity: "country", id: None };
        assert_eq!(err.to_string(), "No country exists with id <none>");
    }
}
