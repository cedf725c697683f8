//! Command-line argument parsing with clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use logstore::entry::COLUMNS;
use logstore::{parse_time, LogLevel, LogQuery, ORDER_ASC, ORDER_DESC};

use crate::error::CliError;

/// Inspect and maintain a logstore database.
#[derive(Parser, Debug, Clone)]
#[command(name = "logstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the `SQLite` database file.
    #[arg(long, env = "LOGSTORE_DB", default_value = "logstore.db")]
    pub db: PathBuf,

    /// Table holding the log entries.
    #[arg(short, long, env = "LOGSTORE_TABLE", default_value = "logs")]
    pub table: String,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Log every SQL statement to stderr.
    #[arg(long)]
    pub debug: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create the log table if it does not exist.
    Migrate,

    /// Write a log entry.
    Write(WriteArgs),

    /// Show a single entry.
    Get {
        /// Entry ID.
        id: String,
    },

    /// List entries matching the filters.
    List(ListArgs),

    /// Count entries matching the filters.
    Count(FilterArgs),

    /// Delete a single entry.
    Delete {
        /// Entry ID.
        id: String,
    },

    /// Delete every entry matching the filters.
    Prune(PruneArgs),
}

/// Arguments for the write command.
#[derive(Args, Debug, Clone)]
pub struct WriteArgs {
    /// Severity level.
    #[arg(short, long, default_value_t = LogLevel::Info)]
    pub level: LogLevel,

    /// Message text.
    #[arg(short, long)]
    pub message: String,

    /// JSON context payload.
    #[arg(short, long)]
    pub context: Option<String>,
}

/// Filters shared by list, count and prune.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Match a single ID.
    #[arg(long)]
    pub id: Option<String>,

    /// Match any of these IDs (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub id_in: Vec<String>,

    /// Match a single level.
    #[arg(long)]
    pub level: Option<String>,

    /// Match any of these levels (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub level_in: Vec<String>,

    /// Message must contain this text.
    #[arg(long)]
    pub message_contains: Option<String>,

    /// Message must not contain this text.
    #[arg(long)]
    pub message_not_contains: Option<String>,

    /// Context must contain this text.
    #[arg(long)]
    pub context_contains: Option<String>,

    /// Context must not contain this text.
    #[arg(long)]
    pub context_not_contains: Option<String>,

    /// Only entries at or after this time (e.g. "2024-05-01" or RFC 3339).
    #[arg(long)]
    pub since: Option<String>,

    /// Only entries at or before this time.
    #[arg(long)]
    pub until: Option<String>,
}

impl FilterArgs {
    /// Builds a query from the filters that were given.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] if a time bound does not parse.
    pub fn to_query(&self) -> Result<LogQuery, CliError> {
        let mut query = LogQuery::new();

        if let Some(id) = &self.id {
            query = query.with_id(id.as_str());
        }
        if !self.id_in.is_empty() {
            query = query.with_id_in(self.id_in.iter().map(String::as_str));
        }
        if let Some(level) = &self.level {
            query = query.with_level(level.as_str());
        }
        if !self.level_in.is_empty() {
            query = query.with_level_in(self.level_in.iter().map(String::as_str));
        }
        if let Some(term) = &self.message_contains {
            query = query.with_message_contains(term.as_str());
        }
        if let Some(term) = &self.message_not_contains {
            query = query.with_message_not_contains(term.as_str());
        }
        if let Some(term) = &self.context_contains {
            query = query.with_context_contains(term.as_str());
        }
        if let Some(term) = &self.context_not_contains {
            query = query.with_context_not_contains(term.as_str());
        }
        if let Some(since) = &self.since {
            query = query.with_time_gte_at(time_arg("since", since)?);
        }
        if let Some(until) = &self.until {
            query = query.with_time_lte_at(time_arg("until", until)?);
        }

        Ok(query)
    }
}

fn time_arg(name: &str, value: &str) -> Result<chrono::DateTime<chrono::Utc>, CliError> {
    parse_time(value)
        .ok_or_else(|| CliError::InvalidArgument(format!("--{name}: unrecognised time {value:?}")))
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Order {
    /// Oldest or smallest first.
    Asc,
    /// Newest or largest first.
    #[default]
    Desc,
}

impl Order {
    /// Returns the direction token the query understands.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => ORDER_ASC,
            Self::Desc => ORDER_DESC,
        }
    }
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Filters.
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Maximum number of entries to show.
    #[arg(short = 'n', long)]
    pub limit: Option<i64>,

    /// Number of matching entries to skip.
    #[arg(long)]
    pub offset: Option<i64>,

    /// Column to sort by.
    #[arg(long, default_value = "time", value_parser = COLUMNS)]
    pub order_by: String,

    /// Sort direction.
    #[arg(long, value_enum, default_value_t = Order::Desc)]
    pub order: Order,
}

impl ListArgs {
    /// Builds the full query: filters, ordering and paging.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] if a filter is malformed.
    pub fn to_query(&self) -> Result<LogQuery, CliError> {
        let mut query = self
            .filters
            .to_query()?
            .with_order_by(self.order_by.as_str())
            .with_order_direction(self.order.as_str());
        if let Some(limit) = self.limit {
            query = query.with_limit(limit);
        }
        if let Some(offset) = self.offset {
            query = query.with_offset(offset);
        }
        Ok(query)
    }
}

/// Arguments for the prune command.
#[derive(Args, Debug, Clone)]
pub struct PruneArgs {
    /// Filters.
    #[command(flatten)]
    pub filters: FilterArgs,

    /// Delete at most this many entries, oldest first.
    #[arg(short = 'n', long)]
    pub limit: Option<i64>,

    /// Allow pruning with no filters, which empties the table.
    #[arg(long)]
    pub all: bool,
}

impl PruneArgs {
    /// Builds the delete query.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidArgument`] if a filter is malformed, or if
    /// no filter is given without `--all`.
    pub fn to_query(&self) -> Result<LogQuery, CliError> {
        let query = self.filters.to_query()?;
        if query == LogQuery::new() && !self.all {
            return Err(CliError::InvalidArgument(
                "prune needs at least one filter, or --all".to_string(),
            ));
        }

        Ok(match self.limit {
            Some(limit) => query
                .with_order_by("time")
                .with_order_direction(ORDER_ASC)
                .with_limit(limit),
            None => query,
        })
    }
}
