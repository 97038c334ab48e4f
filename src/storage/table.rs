//! Generic record table operations
//!
//! One [`Table`] implementation serves every record kind. What differs
//! between continents, countries and regions lives in the record's
//! [`Entity`] impl and its static [`TableSchema`].

use std::marker::PhantomData;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, Statement};
use crate::record::EntityKind;
use crate::{Error, Result};
use super::filter::SearchFilter;
use super::schema::TableSchema;

/// A record type stored in one table.
pub trait Entity: Clone + Sized {
    const KIND: EntityKind;
    const SCHEMA: &'static TableSchema;

    fn id(&self) -> Option<i64>;

    /// The same record with its surrogate id replaced
    fn with_id(self, id: i64) -> Self;

    /// Build a record from a row selected with `SCHEMA.columns`
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Column values in `SCHEMA.columns` order
    fn to_values(&self) -> Vec<Value>;

    /// Empty optional text becomes `None`
    fn normalized(self) -> Self;
}

/// Handle on the table holding records of type `E`
pub struct Table<'conn, E> {
    conn: &'conn Connection,
    _entity: PhantomData<E>,
}

impl<'conn, E: Entity> Table<'conn, E> {
    pub(crate) fn new(conn: &'conn Connection) -> Self {
        Self { conn, _entity: PhantomData }
    }

    /// Prepare an exact-match search.
    ///
    /// Fails with `InvalidQuery` when the filter has no conditions.
    pub fn search(&self, filter: &SearchFilter) -> Result<SearchCursor<'conn, E>> {
        if filter.is_empty() {
            return Err(Error::InvalidQuery(filter.columns().join(", ")));
        }

        let (sql, params) = filter.to_sql(E::SCHEMA);
        let stmt = self.conn.prepare(&sql).map_err(search_failed)?;
        Ok(SearchCursor { stmt, params, _entity: PhantomData })
    }

    /// Load one record by primary key
    pub fn load(&self, id: i64) -> Result<E> {
        let schema = E::SCHEMA;
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            schema.column_list(),
            schema.table,
            schema.key
        );
        let failed = Error::LoadFailed { entity: E::KIND.as_str(), id };

        match self.conn.query_row(&sql, [id], E::from_row).optional() {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(failed),
            Err(e) => {
                tracing::warn!("Loading {} {} failed: {}", E::KIND, id, e);
                Err(failed)
            }
        }
    }

    /// Next surrogate id: one past the current maximum, 1 for an empty table
    pub fn next_id(&self) -> Result<i64> {
        let schema = E::SCHEMA;
        let sql = format!("SELECT MAX({}) FROM {}", schema.key, schema.table);
        let max: Option<i64> = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| {
                tracing::warn!("Scanning {} ids failed: {}", schema.table, e);
                Error::TableUnavailable { table: schema.table }
            })?;
        match max {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                tracing::warn!("{} ids are exhausted", schema.table);
                Error::TableUnavailable { table: schema.table }
            }),
        }
    }

    /// Whether a row with this primary key exists
    pub fn exists(&self, id: i64) -> Result<bool> {
        row_exists(self.conn, E::SCHEMA.table, E::SCHEMA.key, id)
    }

    /// Verify every foreign key of `record` points at an existing row
    pub fn check_references(&self, record: &E) -> Result<()> {
        let values = record.to_values();
        for fk in E::SCHEMA.foreign_keys {
            let id = E::SCHEMA
                .position(fk.column)
                .and_then(|column| match values.get(column) {
                    Some(Value::Integer(id)) => Some(*id),
                    _ => None,
                });
            let not_found = Error::ReferenceNotFound { reference: fk.table, id };
            let Some(id) = id else {
                return Err(not_found);
            };
            match row_exists(self.conn, fk.table, fk.key, id) {
                Ok(true) => {}
                Ok(false) => return Err(not_found),
                Err(e) => {
                    tracing::warn!("Checking {} reference {} failed: {}", fk.table, id, e);
                    return Err(not_found);
                }
            }
        }
        Ok(())
    }

    /// Insert `record` under a freshly assigned id.
    ///
    /// Returns the record as stored, with its id and normalized fields.
    pub fn create(&self, record: E) -> Result<E> {
        let id = self.next_id()?;
        self.check_references(&record)?;
        let record = record.normalized().with_id(id);

        let schema = E::SCHEMA;
        let placeholders: Vec<String> = (1..=schema.columns.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            schema.table,
            schema.column_list(),
            placeholders.join(", ")
        );
        self.conn
            .execute(&sql, params_from_iter(record.to_values()))
            .map_err(rejected::<E>)?;

        tracing::info!("Created {} {}", E::KIND, id);
        Ok(record)
    }

    /// Overwrite the row whose key matches `record`'s id with every field of `record`
    pub fn update(&self, record: &E) -> Result<()> {
        let missing = || Error::RecordNotFound { entity: E::KIND.as_str(), id: record.id() };
        let Some(id) = record.id() else {
            return Err(missing());
        };
        match self.exists(id) {
            Ok(true) => {}
            Ok(false) => return Err(missing()),
            Err(e) => {
                tracing::warn!("Looking up {} {} failed: {}", E::KIND, id, e);
                return Err(missing());
            }
        }
        self.check_references(record)?;

        let schema = E::SCHEMA;
        let assignments: Vec<String> = schema
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?{}",
            schema.table,
            assignments.join(", "),
            schema.key,
            schema.columns.len() + 1
        );
        let mut values = record.clone().normalized().to_values();
        values.push(Value::Integer(id));
        self.conn
            .execute(&sql, params_from_iter(values))
            .map_err(rejected::<E>)?;

        tracing::info!("Updated {} {}", E::KIND, id);
        Ok(())
    }

    /// Number of rows in the table
    pub fn count(&self) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", E::SCHEMA.table);
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|_| Error::TableUnavailable { table: E::SCHEMA.table })?;
        Ok(count as usize)
    }
}

/// A prepared search whose results are read lazily.
pub struct SearchCursor<'conn, E> {
    stmt: Statement<'conn>,
    params: Vec<String>,
    _entity: PhantomData<E>,
}

impl<'conn, E: Entity> SearchCursor<'conn, E> {
    /// Run the search, yielding matches in storage order.
    ///
    /// A failure while stepping or decoding a row shows up as an `Err` item;
    /// callers stop consuming at the first one.
    pub fn results(&mut self) -> Result<impl Iterator<Item = Result<E>> + '_> {
        let rows = self
            .stmt
            .query_map(params_from_iter(self.params.iter()), E::from_row)
            .map_err(search_failed)?;
        Ok(rows.map(|row| row.map_err(search_failed)))
    }
}

fn row_exists(conn: &Connection, table: &str, key: &str, id: i64) -> Result<bool> {
    let sql = format!("SELECT 1 FROM {} WHERE {} = ?1", table, key);
    conn.query_row(&sql, [id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .map_err(|e| Error::Unexpected(e.to_string()))
}

fn search_failed(e: rusqlite::Error) -> Error {
    tracing::warn!("Search failed: {}", e);
    Error::Unexpected("error encountered during search".to_string())
}

fn rejected<E: Entity>(e: rusqlite::Error) -> Error {
    tracing::warn!("Storage rejected {} write: {}", E::KIND, e);
    Error::DuplicateRecord { entity: E::KIND.as_str(), reason: e.to_string() }
}
