//! SQLite connection handling

use std::path::{Path, PathBuf};
use rusqlite::{Connection, OpenFlags};
use crate::{Error, Result};
use super::schema;
use super::table::{Entity, Table};

/// An open, validated reference-data store
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl Database {
    /// Open an existing database file.
    ///
    /// The file must already exist and contain the continent, country and
    /// region tables. Foreign keys are enforced on the returned connection.
    pub fn open(path: &Path) -> Result<Self> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let conn = Connection::open_with_flags(path, flags).map_err(|e| {
            tracing::warn!("Failed to open {}: {}", path.display(), e);
            Error::OpenFailed(format!("file not found or database invalid ({})", path.display()))
        })?;

        let db = Self { conn, path: path.to_path_buf() };
        db.enable_foreign_keys()?;
        db.validate()?;
        Ok(db)
    }

    /// Create (or reuse) a database file and make sure the schema exists
    pub fn create(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| Error::OpenFailed(e.to_string()))?;
        let db = Self { conn, path: path.to_path_buf() };
        db.enable_foreign_keys()?;
        db.initialize_schema()?;
        Ok(db)
    }

    /// Open an in-memory database with the schema installed (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| Error::OpenFailed(e.to_string()))?;
        let db = Self { conn, path: PathBuf::from(":memory:") };
        db.enable_foreign_keys()?;
        db.initialize_schema()?;
        Ok(db)
    }

    fn enable_foreign_keys(&self) -> Result<()> {
        self.conn
            .execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| Error::OpenFailed(format!("database invalid: {}", e)))
    }

    /// Check that the file is a database of the expected shape
    fn validate(&self) -> Result<()> {
        self.conn
            .query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .map_err(|e| {
                tracing::warn!("Schema introspection failed for {}: {}", self.path.display(), e);
                Error::OpenFailed("database invalid".to_string())
            })?;

        for table in schema::REQUIRED_TABLES {
            let found: i64 = self
                .conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .map_err(|e| Error::OpenFailed(format!("database invalid: {}", e)))?;
            if found == 0 {
                return Err(Error::OpenFailed(format!("database has no {} table", table)));
            }
        }
        Ok(())
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn
                .execute(stmt, [])
                .map_err(|e| Error::Unexpected(format!("schema creation failed: {}", e)))?;
        }
        Ok(())
    }

    /// Path this database was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Access the table holding records of type `E`
    pub fn table<E: Entity>(&self) -> Table<'_, E> {
        Table::new(&self.conn)
    }

    /// Raw connection, for callers that need to run their own SQL
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the connection, reporting any error from SQLite
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| Error::Unexpected(format!("failed to close database: {}", e)))
    }
}
