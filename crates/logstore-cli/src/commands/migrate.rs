//! Migrate command implementation.

use std::io::Write;

use logstore::LogStore;
use serde::Serialize;

use crate::error::CliError;
use crate::output::{OutputFormat, TableDisplay};

/// Handler for the migrate command.
pub struct MigrateCommand<'a> {
    store: &'a LogStore,
}

impl<'a> MigrateCommand<'a> {
    /// Creates a new migrate command handler.
    #[must_use]
    pub const fn new(store: &'a LogStore) -> Self {
        Self { store }
    }

    /// Creates the log table if it is missing.
    ///
    /// # Errors
    ///
    /// Returns error if the table cannot be created.
    pub fn execute<W: Write>(&self, out: &mut W, format: &OutputFormat) -> Result<(), CliError> {
        self.store.auto_migrate()?;
        let result = MigrateOutput {
            table: self.store.table().to_string(),
            dialect: self.store.dialect().to_string(),
        };
        format.write(out, &result)
    }
}

/// Migrate result.
#[derive(Debug, Clone, Serialize)]
pub struct MigrateOutput {
    /// Table that is now present.
    pub table: String,
    /// Dialect the table was created in.
    pub dialect: String,
}

impl TableDisplay for MigrateOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Table {} is ready ({})", self.table, self.dialect)?;
        Ok(())
    }
}
