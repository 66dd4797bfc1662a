//! Members command implementation.

use crate::cli::MembersArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use kindred_domain::traits::{MemberQuery, MemberStore};
use kindred_store::SqliteStore;

/// Execute the members command.
pub fn execute_members(args: MembersArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    if args.page == 0 {
        return Err(CliError::InvalidInput("Page must be 1 or greater".to_string()));
    }
    if args.limit == 0 {
        return Err(CliError::InvalidInput("Limit must be 1 or greater".to_string()));
    }

    let query = MemberQuery {
        page: args.page,
        limit: args.limit,
        sort_by: args.sort,
        direction: args.direction(),
        search: args.search.filter(|s| !s.trim().is_empty()),
    };

    let page = store.list_members(&query)?;
    println!("{}", formatter.format_members(&page)?);
    Ok(())
}
