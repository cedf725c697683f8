//! Write command implementation.

use std::io::Write;

use logstore::{LogEntry, LogStore};
use tracing::debug;

use crate::cli::WriteArgs;
use crate::error::CliError;
use crate::output::{EntryView, OutputFormat};

/// Handler for the write command.
pub struct WriteCommand<'a> {
    store: &'a LogStore,
}

impl<'a> WriteCommand<'a> {
    /// Creates a new write command handler.
    #[must_use]
    pub const fn new(store: &'a LogStore) -> Self {
        Self { store }
    }

    /// Writes one entry and prints it back, including its new ID.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] if the context is not valid
    /// JSON, or a store error if the write fails.
    pub fn execute<W: Write>(
        &self,
        out: &mut W,
        format: &OutputFormat,
        args: &WriteArgs,
    ) -> Result<(), CliError> {
        let context = match &args.context {
            Some(raw) => {
                serde_json::from_str::<serde_json::Value>(raw).map_err(|e| {
                    CliError::InvalidArgument(format!("--context is not valid JSON: {e}"))
                })?;
                raw.clone()
            }
            None => String::new(),
        };

        let mut entry = LogEntry::new()
            .with_level(args.level)
            .with_message(args.message.as_str())
            .with_context(context);
        self.store.create(&mut entry)?;
        debug!(id = entry.id(), level = entry.level(), "wrote log entry");

        format.write(out, &EntryView::from(&entry))
    }
}
