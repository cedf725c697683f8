//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use logstore::{format_time, LogEntry};
use serde::Serialize;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// A log entry as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct EntryView {
    /// Entry ID.
    pub id: String,
    /// Level.
    pub level: String,
    /// Message text.
    pub message: String,
    /// Context payload; omitted when empty.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub context: String,
    /// Timestamp in the stored encoding.
    pub time: Option<String>,
}

impl From<&LogEntry> for EntryView {
    fn from(entry: &LogEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            level: entry.level().to_string(),
            message: entry.message().to_string(),
            context: entry.context().to_string(),
            time: entry.time().map(|t| format_time(&t)),
        }
    }
}

impl TableDisplay for EntryView {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "ID:       {}", self.id)?;
        writeln!(writer, "Level:    {}", self.level)?;
        writeln!(writer, "Time:     {}", self.time.as_deref().unwrap_or("-"))?;
        writeln!(writer, "Message:  {}", self.message)?;
        if !self.context.is_empty() {
            writeln!(writer, "Context:  {}", self.context)?;
        }
        Ok(())
    }
}

/// A list of entries for display.
#[derive(Debug, Clone, Serialize)]
pub struct EntryList {
    /// Entries, in query order.
    pub entries: Vec<EntryView>,
}

impl From<&[LogEntry]> for EntryList {
    fn from(entries: &[LogEntry]) -> Self {
        Self {
            entries: entries.iter().map(EntryView::from).collect(),
        }
    }
}

impl TableDisplay for EntryList {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.entries.is_empty() {
            writeln!(writer, "No log entries")?;
            return Ok(());
        }

        // Header
        writeln!(
            writer,
            "{:<36}  {:<26}  {:<7}  {}",
            "ID", "TIME", "LEVEL", "MESSAGE"
        )?;
        writeln!(writer, "{}", "─".repeat(100))?;

        // Rows
        for entry in &self.entries {
            writeln!(
                writer,
                "{:<36}  {:<26}  {:<7}  {}",
                entry.id,
                entry.time.as_deref().unwrap_or("-"),
                entry.level,
                truncate(&entry.message, 60)
            )?;
        }

        writeln!(writer)?;
        let total = self.entries.len() as u64;
        writeln!(writer, "Total: {total} entr{}", plural_y(total))?;
        Ok(())
    }
}

/// Suffix completing "entr" for `n` items.
pub(crate) const fn plural_y(n: u64) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

/// Shortens `s` to at most `max_len` characters, marking the cut with `...`.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{kept}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
