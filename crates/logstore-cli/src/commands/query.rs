//! Get, list and count command implementations.

use std::io::Write;

use logstore::LogStore;
use serde::Serialize;

use crate::cli::{FilterArgs, ListArgs};
use crate::error::CliError;
use crate::output::{EntryList, EntryView, OutputFormat, TableDisplay};

/// Handler for the read-only commands.
pub struct QueryCommand<'a> {
    store: &'a LogStore,
}

impl<'a> QueryCommand<'a> {
    /// Creates a new query command handler.
    #[must_use]
    pub const fn new(store: &'a LogStore) -> Self {
        Self { store }
    }

    /// Shows one entry. A missing entry is reported, not treated as an error.
    ///
    /// # Errors
    ///
    /// Returns error if the lookup fails.
    pub fn get<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        id: &str,
    ) -> Result<(), CliError> {
        let entry = self.store.find_by_id(id)?;
        let result = Lookup {
            id: id.to_string(),
            entry: entry.as_ref().map(EntryView::from),
        };
        format.write(out, &result)
    }

    /// Lists matching entries.
    ///
    /// # Errors
    ///
    /// Returns error if the filters are invalid or the query fails.
    pub fn list<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &ListArgs,
    ) -> Result<(), CliError> {
        let query = args.to_query()?;
        let entries = self.store.list(Some(&query))?;
        format.write(out, &EntryList::from(entries.as_slice()))
    }

    /// Counts matching entries.
    ///
    /// # Errors
    ///
    /// Returns error if the filters are invalid or the query fails.
    pub fn count<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        filters: &FilterArgs,
    ) -> Result<(), CliError> {
        let query = filters.to_query()?;
        let count = self.store.count(Some(&query))?;
        format.write(out, &CountOutput { count })
    }
}

/// Result of a single-entry lookup.
#[derive(Debug, Clone, Serialize)]
pub struct Lookup {
    /// Requested ID.
    pub id: String,
    /// The entry, if it exists.
    pub entry: Option<EntryView>,
}

impl TableDisplay for Lookup {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        match &self.entry {
            Some(entry) => entry.write_table(writer),
            None => {
                writeln!(writer, "Log entry not found: {}", self.id)?;
                Ok(())
            }
        }
    }
}

/// Count result.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountOutput {
    /// Number of matching entries.
    pub count: u64,
}

impl TableDisplay for CountOutput {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "{}", self.count)?;
        Ok(())
    }
}
