//! Log severity levels.
//!
//! Entries store their level as a plain string, so callers may persist any
//! label they like. [`LogLevel`] names the levels the store itself writes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Trace level.
pub const LEVEL_TRACE: &str = "trace";
/// Debug level.
pub const LEVEL_DEBUG: &str = "debug";
/// Info level.
pub const LEVEL_INFO: &str = "info";
/// Warning level.
pub const LEVEL_WARNING: &str = "warning";
/// Error level.
pub const LEVEL_ERROR: &str = "error";
/// Fatal level.
pub const LEVEL_FATAL: &str = "fatal";
/// Panic level.
pub const LEVEL_PANIC: &str = "panic";

/// Log severity levels, ordered from most to least verbose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, detailed debugging information
    Trace = 0,
    /// Debugging information
    Debug = 1,
    /// General information
    Info = 2,
    /// Warning conditions
    Warning = 3,
    /// Error conditions
    Error = 4,
    /// Unrecoverable conditions
    Fatal = 5,
    /// Conditions that abort the caller
    Panic = 6,
}

impl LogLevel {
    /// Returns every level, most verbose first.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Trace,
            Self::Debug,
            Self::Info,
            Self::Warning,
            Self::Error,
            Self::Fatal,
            Self::Panic,
        ]
    }

    /// Returns the string stored for this level.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => LEVEL_TRACE,
            Self::Debug => LEVEL_DEBUG,
            Self::Info => LEVEL_INFO,
            Self::Warning => LEVEL_WARNING,
            Self::Error => LEVEL_ERROR,
            Self::Fatal => LEVEL_FATAL,
            Self::Panic => LEVEL_PANIC,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            LEVEL_TRACE => Ok(Self::Trace),
            LEVEL_DEBUG => Ok(Self::Debug),
            LEVEL_INFO => Ok(Self::Info),
            LEVEL_WARNING | "warn" => Ok(Self::Warning),
            LEVEL_ERROR => Ok(Self::Error),
            LEVEL_FATAL => Ok(Self::Fatal),
            LEVEL_PANIC => Ok(Self::Panic),
            other => Err(StoreError::Validation(format!("unknown log level: {other}"))),
        }
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_ordering() {
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warning);
        assert!(LogLevel::Warning < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Fatal);
        assert!(LogLevel::Fatal < LogLevel::Panic);
    }

    #[test]
    fn log_level_as_str() {
        assert_eq!(LogLevel::Trace.as_str(), "trace");
        assert_eq!(LogLevel::Debug.as_str(), "debug");
        assert_eq!(LogLevel::Info.as_str(), "info");
        assert_eq!(LogLevel::Warning.as_str(), "warning");
        assert_eq!(LogLevel::Error.as_str(), "error");
        assert_eq!(LogLevel::Fatal.as_str(), "fatal");
        assert_eq!(LogLevel::Panic.as_str(), "panic");
    }

    #[test]
    fn log_level_parse_roundtrips_every_level() {
        for level in LogLevel::all() {
            assert_eq!(level.as_str().parse::<LogLevel>().ok(), Some(level));
        }
    }

    #[test]
    fn log_level_parse_is_case_insensitive_and_accepts_warn() {
        assert_eq!("ERROR".parse::<LogLevel>().ok(), Some(LogLevel::Error));
        assert_eq!("warn".parse::<LogLevel>().ok(), Some(LogLevel::Warning));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn log_level_serialization() {
        let json = serde_json::to_string(&LogLevel::Warning).map_err(|e| format!("serialize: {e}"));
        assert_eq!(json, Ok("\"warning\"".to_string()));

        let deserialized: Result<LogLevel, _> =
            serde_json::from_str("\"fatal\"").map_err(|e| format!("deserialize: {e}"));
        assert_eq!(deserialized, Ok(LogLevel::Fatal));
    }

    #[test]
    fn log_level_into_string() {
        let s: String = LogLevel::Panic.into();
        assert_eq!(s, "panic");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }
}
