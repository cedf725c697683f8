//! logstore CLI binary entrypoint.
//!
//! This is the main entry point for the `logstore` command-line tool.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use logstore::{LogStore, SqliteExecutor, StoreConfig};
use logstore_cli::cli::{Cli, Commands};
use logstore_cli::commands::{DeleteCommand, MigrateCommand, QueryCommand, WriteCommand};
use logstore_cli::output::OutputFormat;
use logstore_cli::CliError;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; RUST_LOG wins over --debug
    let default_filter = if cli.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();
    match run(&cli, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open_store(cli: &Cli) -> Result<LogStore, CliError> {
    let executor = SqliteExecutor::open(&cli.db)?;
    let store = LogStore::new(
        StoreConfig::new(cli.table.as_str())
            .with_executor(Arc::new(executor))
            .with_automigrate(true)
            .with_debug(cli.debug),
    )?;
    Ok(store)
}

fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CliError> {
    let format = OutputFormat::new(cli.format);
    let store = open_store(cli)?;

    match &cli.command {
        Commands::Migrate => MigrateCommand::new(&store).execute(out, &format)?,
        Commands::Write(args) => WriteCommand::new(&store).execute(out, &format, args)?,
        Commands::Get { id } => QueryCommand::new(&store).get(out, &format, id)?,
        Commands::List(args) => QueryCommand::new(&store).list(out, &format, args)?,
        Commands::Count(filters) => QueryCommand::new(&store).count(out, &format, filters)?,
        Commands::Delete { id } => DeleteCommand::new(&store).delete(out, &format, id)?,
        Commands::Prune(args) => DeleteCommand::new(&store).prune(out, &format, args)?,
    }

    Ok(())
}
