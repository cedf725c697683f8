//! CLI command implementations.
//!
//! Each submodule implements a group of CLI commands:
//! - [`migrate`] - Table creation
//! - [`write`] - Writing entries
//! - [`query`] - Reading and counting entries
//! - [`delete`] - Deleting and pruning entries

pub mod delete;
pub mod migrate;
pub mod query;
pub mod write;

pub use delete::DeleteCommand;
pub use migrate::MigrateCommand;
pub use query::QueryCommand;
pub use write::WriteCommand;

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use logstore::{LogStore, SqliteExecutor, StoreConfig};

    /// Opens a migrated in-memory store.
    pub fn store() -> LogStore {
        let executor = SqliteExecutor::open_in_memory().expect("open in-memory db");
        LogStore::new(
            StoreConfig::new("logs")
                .with_executor(Arc::new(executor))
                .with_automigrate(true),
        )
        .expect("create store")
    }
}
