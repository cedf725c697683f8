//! Execution seam between the store and a database.
//!
//! This module provides:
//! - [`Executor`]: runs rendered statements and returns affected counts or rows
//! - [`Row`]: a result row as a string-keyed map of string values
//! - [`SqliteExecutor`]: an [`Executor`] over a `rusqlite` connection

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::types::{ToSqlOutput, ValueRef};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::debug;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::translate::Param;

/// A result row: column name to value text. SQL `NULL` columns are absent.
pub type Row = HashMap<String, String>;

/// Runs statements against a database.
///
/// Implementors must be safe to share between threads; the store never
/// serializes calls on their behalf.
pub trait Executor: Send + Sync {
    /// Returns the dialect statements for this database must be rendered in.
    fn dialect(&self) -> Dialect;

    /// Executes a statement and returns the number of rows it changed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Execution`](crate::StoreError::Execution) if
    /// the statement fails.
    fn execute(&self, sql: &str, params: &[Param]) -> Result<u64>;

    /// Runs a query and returns every resulting row.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Execution`](crate::StoreError::Execution) if
    /// the query fails.
    fn query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>>;
}

/// [`Executor`] backed by a single `SQLite` connection.
pub struct SqliteExecutor {
    conn: Mutex<Connection>,
}

impl SqliteExecutor {
    /// Opens (creating if needed) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the database cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening sqlite database");
        Ok(Self::from_connection(Connection::open(path)?))
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the database cannot be opened.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(Connection::open_in_memory()?))
    }

    /// Wraps an already-open connection.
    #[must_use]
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Text(s) => s.to_sql(),
            Self::Int(n) => n.to_sql(),
        }
    }
}

fn value_text(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

impl Executor for SqliteExecutor {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn execute(&self, sql: &str, params: &[Param]) -> Result<u64> {
        let conn = self.conn.lock();
        let changed = conn.execute(sql, params_from_iter(params.iter()))?;
        Ok(changed as u64)
    }

    fn query(&self, sql: &str, params: &[Param]) -> Result<Vec<Row>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let columns: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut rows = stmt.query(params_from_iter(params.iter()))?;
        let mut out = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = Row::with_capacity(columns.len());
            for (i, name) in columns.iter().enumerate() {
                if let Some(text) = value_text(row.get_ref(i)?) {
                    map.insert(name.clone(), text);
                }
            }
            out.push(map);
        }

        Ok(out)
    }
}
