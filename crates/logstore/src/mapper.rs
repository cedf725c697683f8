//! Conversion of result rows back into log entries.

use tracing::warn;

use crate::entry::{
    parse_time, LogEntry, COLUMN_CONTEXT, COLUMN_ID, COLUMN_LEVEL, COLUMN_MESSAGE, COLUMN_TIME,
};
use crate::executor::Row;

fn text(row: &Row, column: &str) -> String {
    row.get(column).cloned().unwrap_or_default()
}

/// Builds an entry from a result row.
///
/// Missing columns read as empty strings. The time column is parsed only when
/// present and non-empty; a value that does not parse leaves the time unset
/// and is reported as a warning. Mapping never fails.
#[must_use]
pub fn entry_from_row(row: &Row) -> LogEntry {
    let id = text(row, COLUMN_ID);

    let time = match row.get(COLUMN_TIME).map(String::as_str) {
        None | Some("") => None,
        Some(raw) => {
            let parsed = parse_time(raw);
            if parsed.is_none() {
                warn!(id = %id, time = raw, "unparseable log entry time");
            }
            parsed
        }
    };

    LogEntry::with_data(
        id,
        text(row, COLUMN_LEVEL),
        text(row, COLUMN_MESSAGE),
        text(row, COLUMN_CONTEXT),
        time,
    )
}
