//! SQL dialects the translator can target.
//!
//! Each dialect selects the `sea-query` backend statements are built with,
//! and names the column type used for timestamps when creating the log
//! table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Relational engine family a statement is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `SQLite` (`?` placeholders, double-quoted identifiers).
    Sqlite,
    /// `PostgreSQL` (`$n` placeholders, double-quoted identifiers).
    Postgres,
    /// `MySQL` / `MariaDB` (`?` placeholders, backtick identifiers).
    MySql,
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Self; 3] = [Self::Sqlite, Self::Postgres, Self::MySql];

    /// Returns the canonical dialect name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::MySql => "mysql",
        }
    }

    /// Returns true if the engine rejects `OFFSET` without a `LIMIT`.
    #[must_use]
    pub const fn offset_needs_limit(&self) -> bool {
        matches!(self, Self::Sqlite | Self::MySql)
    }

    /// Column type used for the timestamp column of the log table.
    ///
    /// Wide enough to keep the microseconds of the persisted encoding.
    #[must_use]
    pub const fn time_type(&self) -> &'static str {
        match self {
            Self::Sqlite => "DATETIME",
            Self::Postgres => "TIMESTAMP(6)",
            Self::MySql => "DATETIME(6)",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = StoreError;

    /// Parses a dialect or driver name, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgres" | "postgresql" | "pgx" => Ok(Self::Postgres),
            "mysql" | "mariadb" => Ok(Self::MySql),
            other => Err(StoreError::Config(format!("unsupported dialect: {other}"))),
        }
    }
}
