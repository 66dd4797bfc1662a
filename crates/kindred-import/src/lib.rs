//! Kindred Importer
//!
//! Loads members from CSV and builds the family tree from their genealogy
//! codes.
//!
//! # Overview
//!
//! An import runs in two passes. Pass 1 creates or updates one member per
//! row. Pass 2 resolves every code into partner and parent/child relation
//! edges, looking members up in an index snapshot taken after Pass 1, so row
//! order never matters. A bad row or code is reported in the result and the
//! batch carries on; only storage and I/O failures abort it.
//!
//! # Architecture
//!
//! ```text
//! CSV → rows → MemberStore (pass 1) → MemberIndex → RelationResolver → RelationStore (pass 2)
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use kindred_import::{ImportConfig, Importer};
//! use kindred_store::SqliteStore;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::new("kindred.db")?;
//! let mut importer = Importer::new(store, ImportConfig::default())?;
//!
//! let result = importer.import_path("members.csv")?;
//!
//! println!("Members created: {}", result.members_created);
//! println!("Relations created: {}", result.relations_created);
//! for error in &result.errors {
//!     println!("line {}: {}", error.line, error.message);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod importer;
mod resolver;
mod rows;
mod types;


pub use config::ImportConfig;
pub use error::{ImportError, RelationError};
pub use importer::Importer;
pub use resolver::RelationResolver;
pub use types::{ImportResult, LineError, ResolveOutcome};
