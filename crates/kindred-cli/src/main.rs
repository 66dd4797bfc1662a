//! Kindred CLI - Import family members and explore their relations.

use clap::Parser;
use kindred_cli::commands;
use kindred_cli::{Cli, Command, Config, Formatter};
use kindred_store::SqliteStore;
use std::fs;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> kindred_cli::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let db_path = cli.db.unwrap_or(config.database_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    debug!("Opening database {}", db_path.display());
    let store = SqliteStore::new(&db_path)?;

    match cli.command {
        Command::Import(args) => commands::execute_import(args, store, config.import, &formatter),
        Command::Members(args) => commands::execute_members(args, &store, &formatter),
        Command::Relations(args) => commands::execute_relations(args, &store, &formatter),
    }
}
