//! The log record entity and its persisted column layout.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::level::LEVEL_INFO;

/// Column holding the record id.
pub const COLUMN_ID: &str = "id";
/// Column holding the level string.
pub const COLUMN_LEVEL: &str = "level";
/// Column holding the message text.
pub const COLUMN_MESSAGE: &str = "message";
/// Column holding the serialized context payload.
pub const COLUMN_CONTEXT: &str = "context";
/// Column holding the record timestamp.
pub const COLUMN_TIME: &str = "time";

/// All columns, in insert order.
pub const COLUMNS: [&str; 5] = [
    COLUMN_ID,
    COLUMN_LEVEL,
    COLUMN_MESSAGE,
    COLUMN_CONTEXT,
    COLUMN_TIME,
];

/// Text encoding used for persisted timestamps.
///
/// Fixed microsecond precision keeps lexical order chronological, so range
/// bounds built with [`format_time`] compare correctly as text.
pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

/// Encodes a timestamp the way the store persists it.
#[must_use]
pub fn format_time(time: &DateTime<Utc>) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parses a stored timestamp, treating offset-less values as UTC.
///
/// Returns `None` for anything that is not a recognised encoding.
#[must_use]
pub fn parse_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    // Offsets in the form some drivers write ("+00:00" after a space separator)
    if let Ok(t) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(t.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// A single log record.
///
/// Fields are private; read them through the accessors and change them
/// through the `with_*` builders or `set_*` mutators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    id: String,
    level: String,
    message: String,
    context: String,
    time: Option<DateTime<Utc>>,
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEntry {
    /// Creates an `info` entry with no id and no time.
    ///
    /// The store fills in the id and time when the entry is created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: String::new(),
            level: LEVEL_INFO.to_string(),
            message: String::new(),
            context: String::new(),
            time: None,
        }
    }

    /// Creates an entry from already-known values.
    #[must_use]
    pub fn with_data(
        id: impl Into<String>,
        level: impl Into<String>,
        message: impl Into<String>,
        context: impl Into<String>,
        time: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: id.into(),
            level: level.into(),
            message: message.into(),
            context: context.into(),
            time,
        }
    }

    /// Returns the id (empty until assigned).
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the level.
    #[must_use]
    pub fn level(&self) -> &str {
        &self.level
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the context payload.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns the timestamp, if one has been set.
    #[must_use]
    pub const fn time(&self) -> Option<DateTime<Utc>> {
        self.time
    }

    /// Sets the id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the level.
    #[must_use]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the context payload.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Sets the timestamp.
    #[must_use]
    pub const fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Replaces the id in place.
    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    /// Replaces the level in place.
    pub fn set_level(&mut self, level: impl Into<String>) -> &mut Self {
        self.level = level.into();
        self
    }

    /// Replaces the message in place.
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        self.message = message.into();
        self
    }

    /// Replaces the context in place.
    pub fn set_context(&mut self, context: impl Into<String>) -> &mut Self {
        self.context = context.into();
        self
    }

    /// Replaces the timestamp in place; `None` clears it.
    pub fn set_time(&mut self, time: Option<DateTime<Utc>>) -> &mut Self {
        self.time = time;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LogLevel;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn new_entry_defaults() {
        let entry = LogEntry::new();
        assert!(entry.id().is_empty());
        assert_eq!(entry.level(), "info");
        assert!(entry.message().is_empty());
        assert!(entry.context().is_empty());
        assert!(entry.time().is_none());
    }

    #[test]
    fn builder_sets_all_fields() {
        let now = Utc::now();
        let entry = LogEntry::new()
            .with_id("abc")
            .with_level(LogLevel::Error)
            .with_message("disk full")
            .with_context(r#"{"disk":"/dev/sda"}"#)
            .with_time(now);

        assert_eq!(entry.id(), "abc");
        assert_eq!(entry.level(), "error");
        assert_eq!(entry.message(), "disk full");
        assert_eq!(entry.context(), r#"{"disk":"/dev/sda"}"#);
        assert_eq!(entry.time(), Some(now));
    }

    #[test]
    fn level_accepts_arbitrary_strings() {
        let entry = LogEntry::new().with_level("audit");
        assert_eq!(entry.level(), "audit");
    }

    #[test]
    fn setters_mutate_in_place() {
        let mut entry = LogEntry::new();
        entry.set_id("x").set_message("hello").set_level("debug");
        assert_eq!(entry.id(), "x");
        assert_eq!(entry.message(), "hello");
        assert_eq!(entry.level(), "debug");

        entry.set_time(Some(Utc::now()));
        assert!(entry.time().is_some());
        entry.set_time(None);
        assert!(entry.time().is_none());
    }

    #[test]
    fn format_time_is_fixed_width() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).single();
        assert!(t.is_some());
        if let Some(t) = t {
            assert_eq!(format_time(&t), "2024-03-05 07:08:09.000000");
        }
    }

    #[test]
    fn format_time_sorts_lexically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).single();
        let later = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).single();
        if let (Some(a), Some(b)) = (earlier, later) {
            assert!(format_time(&a) < format_time(&b));
        }
    }

    #[test]
    fn parse_time_accepts_stored_encoding() {
        let now = Utc::now().with_nanosecond(123_456_000);
        assert!(now.is_some());
        if let Some(now) = now {
            assert_eq!(parse_time(&format_time(&now)), Some(now));
        }
    }

    #[test]
    fn parse_time_accepts_other_encodings() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).single();
        assert_eq!(parse_time("2024-03-05T07:08:09Z"), expected);
        assert_eq!(parse_time("2024-03-05T09:08:09+02:00"), expected);
        assert_eq!(parse_time("2024-03-05 07:08:09"), expected);
        assert_eq!(parse_time("2024-03-05T07:08:09"), expected);
        assert_eq!(parse_time("2024-03-05 07:08:09+00:00"), expected);
        assert_eq!(
            parse_time("2024-03-05"),
            Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).single()
        );
    }

    #[test]
    fn parse_time_rejects_garbage() {
        assert_eq!(parse_time("yesterday"), None);
        assert_eq!(parse_time(""), None);
    }

    #[test]
    fn entry_serialization_roundtrip() {
        let entry = LogEntry::with_data("id-1", "warning", "low", "{}", Some(Utc::now()));
        let json = serde_json::to_string(&entry).expect("serialize");
        let parsed: LogEntry = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, entry);
    }
}
