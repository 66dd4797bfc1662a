//! Import command implementation.

use crate::cli::ImportArgs;
use crate::error::Result;
use crate::output::Formatter;
use kindred_import::{ImportConfig, Importer};
use kindred_store::SqliteStore;
use tracing::info;

/// Execute the import command.
///
/// Row errors are printed with the result and do not fail the command.
pub fn execute_import(
    args: ImportArgs,
    store: SqliteStore,
    config: ImportConfig,
    formatter: &Formatter,
) -> Result<()> {
    let mut importer = Importer::new(store, config)?;
    let result = importer.import_path(&args.file)?;

    if result.has_errors() {
        info!("{} row(s) of {} were rejected", result.errors.len(), args.file.display());
    }

    println!("{}", formatter.format_import_result(&result)?);
    Ok(())
}
