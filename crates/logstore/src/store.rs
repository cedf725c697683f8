//! SQL-backed log store.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{SubsecRound, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dialect::Dialect;
use crate::entry::LogEntry;
use crate::error::{Result, StoreError};
use crate::executor::Executor;
use crate::level::{
    LEVEL_DEBUG, LEVEL_ERROR, LEVEL_FATAL, LEVEL_INFO, LEVEL_PANIC, LEVEL_TRACE, LEVEL_WARNING,
};
use crate::mapper::entry_from_row;
use crate::query::LogQuery;
use crate::translate::{Statement, Translator, COUNT_ALIAS};

/// Context stored in place of a payload that could not be serialized.
pub const JSON_ENCODE_ERROR: &str = "JSON encode error";

/// Configuration for a [`LogStore`].
#[derive(Clone, Default)]
pub struct StoreConfig {
    /// Table the entries live in. Required.
    pub table: String,
    /// Executor statements are run on. Required.
    pub executor: Option<Arc<dyn Executor>>,
    /// Dialect to render statements in; taken from the executor when unset.
    pub dialect: Option<Dialect>,
    /// Create the table while constructing the store.
    pub automigrate: bool,
    /// Trace every statement before it runs.
    pub debug: bool,
}

impl StoreConfig {
    /// Creates a configuration for `table` with no executor.
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Sets the executor.
    #[must_use]
    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Overrides the dialect reported by the executor.
    #[must_use]
    pub const fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Enables or disables table creation at construction.
    #[must_use]
    pub const fn with_automigrate(mut self, automigrate: bool) -> Self {
        self.automigrate = automigrate;
        self
    }

    /// Enables or disables statement tracing.
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("table", &self.table)
            .field("executor", &self.executor.as_ref().map(|e| e.dialect()))
            .field("dialect", &self.dialect)
            .field("automigrate", &self.automigrate)
            .field("debug", &self.debug)
            .finish()
    }
}

/// Persists log entries to a SQL table and queries them back.
///
/// The store is `Send + Sync`; share it behind an [`Arc`] when several
/// threads write logs.
pub struct LogStore {
    translator: Translator,
    executor: Arc<dyn Executor>,
    debug: AtomicBool,
}

impl fmt::Debug for LogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStore")
            .field("translator", &self.translator)
            .field("debug", &self.is_debug())
            .finish_non_exhaustive()
    }
}

impl LogStore {
    /// Creates a store from `config`, creating the table if `automigrate`
    /// is set.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] if the table name is empty or no
    /// executor is configured, and any error from table creation.
    pub fn new(config: StoreConfig) -> Result<Self> {
        if config.table.is_empty() {
            return Err(StoreError::Config("log table name is required".to_string()));
        }
        let executor = config
            .executor
            .ok_or_else(|| StoreError::Config("executor is required".to_string()))?;
        let dialect = config.dialect.unwrap_or_else(|| executor.dialect());

        let store = Self {
            translator: Translator::new(dialect, config.table),
            executor,
            debug: AtomicBool::new(config.debug),
        };

        if config.automigrate {
            store.auto_migrate()?;
        }

        Ok(store)
    }

    /// Returns the table name.
    #[must_use]
    pub fn table(&self) -> &str {
        self.translator.table()
    }

    /// Returns the dialect statements are rendered in.
    #[must_use]
    pub const fn dialect(&self) -> Dialect {
        self.translator.dialect()
    }

    /// Returns true if statement tracing is on.
    #[must_use]
    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::Relaxed)
    }

    /// Turns statement tracing on or off.
    pub fn set_debug(&self, debug: bool) {
        self.debug.store(debug, Ordering::Relaxed);
    }

    fn trace_statement(&self, stmt: &Statement) {
        if self.is_debug() {
            debug!(
                table = self.table(),
                sql = %stmt.sql,
                params = ?stmt.params,
                "executing statement"
            );
        }
    }

    fn report_failure(&self, stmt: &Statement, err: &StoreError) {
        if self.is_debug() {
            warn!(table = self.table(), sql = %stmt.sql, error = %err, "statement failed");
        }
    }

    fn execute(&self, stmt: &Statement) -> Result<u64> {
        self.trace_statement(stmt);
        self.executor
            .execute(&stmt.sql, &stmt.params)
            .inspect_err(|e| self.report_failure(stmt, e))
    }

    fn query(&self, stmt: &Statement) -> Result<Vec<crate::executor::Row>> {
        self.trace_statement(stmt);
        self.executor
            .query(&stmt.sql, &stmt.params)
            .inspect_err(|e| self.report_failure(stmt, e))
    }

    /// Creates the log table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the statement fails.
    pub fn auto_migrate(&self) -> Result<()> {
        let stmt = self.translator.create_table()?;
        self.execute(&stmt)?;
        debug!(table = self.table(), "log table ready");
        Ok(())
    }

    /// Inserts `entry`, first giving it a fresh id if it has none and the
    /// current time if its time is unset.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn create(&self, entry: &mut LogEntry) -> Result<()> {
        if entry.id().is_empty() {
            entry.set_id(Uuid::now_v7().to_string());
        }
        if entry.time().is_none() {
            // Stored with microsecond precision.
            entry.set_time(Some(Utc::now().trunc_subsecs(6)));
        }

        let stmt = self.translator.insert(entry)?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// Same as [`LogStore::create`].
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn log(&self, entry: &mut LogEntry) -> Result<()> {
        self.create(entry)
    }

    /// Finds the entry with `id`, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `id` is empty, and any
    /// execution error.
    pub fn find_by_id(&self, id: &str) -> Result<Option<LogEntry>> {
        if id.is_empty() {
            return Err(StoreError::Validation("log entry id is empty".to_string()));
        }
        let query = LogQuery::new().with_id(id).with_limit(1);
        Ok(self.list(Some(&query))?.into_iter().next())
    }

    /// Lists entries matching `query`; `None` lists every entry.
    ///
    /// # Errors
    ///
    /// Returns the query's validation error, or any execution error.
    pub fn list(&self, query: Option<&LogQuery>) -> Result<Vec<LogEntry>> {
        let everything = LogQuery::new();
        let stmt = self.translator.select(query.unwrap_or(&everything))?;
        let rows = self.query(&stmt)?;
        Ok(rows.iter().map(entry_from_row).collect())
    }

    /// Counts entries matching `query`, ignoring its limit and offset.
    ///
    /// # Errors
    ///
    /// Returns the query's validation error, any execution error, or
    /// [`StoreError::UnexpectedResult`] if the count is not a non-negative
    /// integer.
    pub fn count(&self, query: Option<&LogQuery>) -> Result<u64> {
        let everything = LogQuery::new();
        let stmt = self.translator.count(query.unwrap_or(&everything))?;
        let rows = self.query(&stmt)?;

        let value = rows
            .first()
            .and_then(|row| row.get(COUNT_ALIAS))
            .ok_or_else(|| {
                StoreError::UnexpectedResult("count query returned no value".to_string())
            })?;

        value
            .trim()
            .parse::<u64>()
            .map_err(|_| StoreError::UnexpectedResult(format!("count was {value:?}")))
    }

    /// Deletes `entry` by its id. Deleting a missing entry succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the entry has no id, and any
    /// execution error.
    pub fn delete(&self, entry: &LogEntry) -> Result<()> {
        self.delete_by_id(entry.id())
    }

    /// Deletes the entry with `id`. Deleting a missing entry succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `id` is empty, and any
    /// execution error.
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(StoreError::Validation("log entry id is empty".to_string()));
        }
        let stmt = self.translator.delete(&LogQuery::new().with_id(id))?;
        self.execute(&stmt)?;
        Ok(())
    }

    /// Deletes every entry matching `query`, honouring its ordering, limit
    /// and offset. Returns the number of entries removed.
    ///
    /// # Errors
    ///
    /// Returns the query's validation error, or any execution error.
    pub fn delete_matching(&self, query: &LogQuery) -> Result<u64> {
        let stmt = self.translator.delete(query)?;
        let removed = self.execute(&stmt)?;
        debug!(table = self.table(), removed, "deleted matching log entries");
        Ok(removed)
    }

    fn write(&self, level: &str, message: &str, context: String) -> Result<()> {
        let mut entry = LogEntry::new()
            .with_level(level)
            .with_message(message)
            .with_context(context);
        self.create(&mut entry)
    }

    fn encode_context<C: Serialize + ?Sized>(context: &C) -> String {
        serde_json::to_string(context).unwrap_or_else(|e| {
            warn!(error = %e, "failed to encode log context");
            JSON_ENCODE_ERROR.to_string()
        })
    }

    fn write_with_context<C: Serialize + ?Sized>(
        &self,
        level: &str,
        message: &str,
        context: &C,
    ) -> Result<()> {
        self.write(level, message, Self::encode_context(context))
    }

    /// Writes a `trace` entry.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn trace(&self, message: &str) -> Result<()> {
        self.write(LEVEL_TRACE, message, String::new())
    }

    /// Writes a `trace` entry with `context` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn trace_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> Result<()> {
        self.write_with_context(LEVEL_TRACE, message, context)
    }

    /// Writes a `debug` entry.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn debug(&self, message: &str) -> Result<()> {
        self.write(LEVEL_DEBUG, message, String::new())
    }

    /// Writes a `debug` entry with `context` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn debug_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> Result<()> {
        self.write_with_context(LEVEL_DEBUG, message, context)
    }

    /// Writes an `info` entry.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn info(&self, message: &str) -> Result<()> {
        self.write(LEVEL_INFO, message, String::new())
    }

    /// Writes an `info` entry with `context` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn info_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> Result<()> {
        self.write_with_context(LEVEL_INFO, message, context)
    }

    /// Writes a `warning` entry.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn warn(&self, message: &str) -> Result<()> {
        self.write(LEVEL_WARNING, message, String::new())
    }

    /// Writes a `warning` entry with `context` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn warn_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> Result<()> {
        self.write_with_context(LEVEL_WARNING, message, context)
    }

    /// Writes an `error` entry.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn error(&self, message: &str) -> Result<()> {
        self.write(LEVEL_ERROR, message, String::new())
    }

    /// Writes an `error` entry with `context` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn error_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> Result<()> {
        self.write_with_context(LEVEL_ERROR, message, context)
    }

    /// Writes a `fatal` entry. The process is left running.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn fatal(&self, message: &str) -> Result<()> {
        self.write(LEVEL_FATAL, message, String::new())
    }

    /// Writes a `fatal` entry with `context` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an execution error if the insert fails.
    pub fn fatal_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> Result<()> {
        self.write_with_context(LEVEL_FATAL, message, context)
    }

    /// Writes a `panic` entry, then panics with `message`.
    ///
    /// # Panics
    ///
    /// Always. If the write failed, the panic message also carries the
    /// write error.
    pub fn panic(&self, message: &str) -> ! {
        let written = self.write(LEVEL_PANIC, message, String::new());
        Self::raise(message, written)
    }

    /// Writes a `panic` entry with `context` serialized as JSON, then
    /// panics with `message`.
    ///
    /// # Panics
    ///
    /// Always, as [`LogStore::panic`].
    pub fn panic_with_context<C: Serialize + ?Sized>(&self, message: &str, context: &C) -> ! {
        let written = self.write_with_context(LEVEL_PANIC, message, context);
        Self::raise(message, written)
    }

    #[allow(clippy::panic)]
    fn raise(message: &str, written: Result<()>) -> ! {
        match written {
            Ok(()) => panic!("{message}"),
            Err(e) => panic!("{message} (log write failed: {e})"),
        }
    }
}
