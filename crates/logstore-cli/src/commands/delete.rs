//! Delete and prune command implementations.

use std::io::Write;

use logstore::LogStore;
use serde::Serialize;
use tracing::info;

use crate::cli::PruneArgs;
use crate::error::CliError;
use crate::output::{plural_y, OutputFormat, TableDisplay};

/// Handler for the destructive commands.
pub struct DeleteCommand<'a> {
    store: &'a LogStore,
}

impl<'a> DeleteCommand<'a> {
    /// Creates a new delete command handler.
    #[must_use]
    pub const fn new(store: &'a LogStore) -> Self {
        Self { store }
    }

    /// Deletes one entry. Deleting a missing entry succeeds.
    ///
    /// # Errors
    ///
    /// Returns error if the delete fails.
    pub fn delete<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: &str,
    ) -> Result<(), CliError> {
        self.store.delete_by_id(id)?;
        format.write(out, &Deleted { id: id.to_string() })
    }

    /// Deletes every entry matching the prune filters.
    ///
    /// # Errors
    ///
    /// Returns error if the filters are invalid or the delete fails.
    pub fn prune<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &PruneArgs,
    ) -> Result<(), CliError> {
        let query = args.to_query()?;
        let removed = self.store.delete_matching(&query)?;
        info!(table = self.store.table(), removed, "pruned log entries");
        format.write(out, &Pruned { removed })
    }
}

/// Delete result.
#[derive(Debug, Clone, Serialize)]
pub struct Deleted {
    /// ID that no longer exists.
    pub id: String,
}

impl TableDisplay for Deleted {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Deleted {}", self.id)?;
        Ok(())
    }
}

/// Prune result.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Pruned {
    /// Number of entries removed.
    pub removed: u64,
}

impl TableDisplay for Pruned {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Pruned {} entr{}", self.removed, plural_y(self.removed))?;
        Ok(())
    }
}
