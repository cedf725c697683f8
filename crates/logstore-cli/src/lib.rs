//! # logstore-cli
//!
//! Command-line access to a logstore `SQLite` database.
//!
//! Provides commands for:
//! - Creating the log table
//! - Writing entries
//! - Showing, listing and counting entries with filters
//! - Deleting single entries and pruning by filter

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, FilterArgs, Format, ListArgs, PruneArgs, WriteArgs};
pub use error::CliError;
pub use output::OutputFormat;
