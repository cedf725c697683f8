//! # logstore
//!
//! Structured application logs persisted to a SQL table.
//!
//! This crate provides:
//!
//! - [`LogEntry`]: a single record (id, level, message, context, time)
//! - [`LogLevel`]: the conventional severity levels
//! - [`LogQuery`]: optional filter, sort and paging criteria
//! - [`Translator`]: compiles queries into parameterized SQL for a [`Dialect`],
//!   built with `sea-query`
//! - [`LogStore`]: writes, reads, counts and deletes entries through an [`Executor`]
//! - [`SqliteExecutor`]: an [`Executor`] backed by `SQLite`
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use logstore::{LogLevel, LogQuery, LogStore, SqliteExecutor, StoreConfig};
//!
//! # fn main() -> logstore::Result<()> {
//! let executor = SqliteExecutor::open_in_memory()?;
//! let store = LogStore::new(
//!     StoreConfig::new("logs")
//!         .with_executor(Arc::new(executor))
//!         .with_automigrate(true),
//! )?;
//!
//! store.info("service started")?;
//! store.error_with_context("upstream timeout", &serde_json::json!({"upstream": "billing"}))?;
//!
//! let errors = LogQuery::new().with_level(LogLevel::Error);
//! assert_eq!(store.count(Some(&errors))?, 1);
//! assert_eq!(store.list(None)?.len(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod dialect;
pub mod entry;
pub mod error;
pub mod executor;
pub mod level;
pub mod mapper;
pub mod query;
pub mod store;
pub mod translate;

// Re-export main types
pub use dialect::Dialect;
pub use entry::{format_time, parse_time, LogEntry, TIME_FORMAT};
pub use error::{ExecError, Result, StoreError};
pub use executor::{Executor, Row, SqliteExecutor};
pub use level::LogLevel;
pub use mapper::entry_from_row;
pub use query::{LogQuery, ORDER_ASC, ORDER_DESC};
pub use store::{LogStore, StoreConfig, JSON_ENCODE_ERROR};
pub use translate::{Param, Statement, Translator, LIKE_ESCAPE};
