//! Error types for member import and relation resolution

use kindred_domain::CodeError;
use thiserror::Error;

/// Errors raised while resolving the relations of one code
///
/// Everything except [`RelationError::Store`] is a data problem confined to
/// that code; the import reports it against the row and moves on.
#[derive(Error, Debug)]
pub enum RelationError {
    /// No member has this code
    #[error("Member not found for code {0}")]
    MemberNotFound(String),

    /// The member a partner code points at does not exist
    #[error("Base member {base} not found for partner {code}")]
    PartnerBaseNotFound {
        /// Code of the missing base member
        base: String,
        /// Partner code being resolved
        code: String,
    },

    /// The direct ancestor does not exist
    #[error("Parent {parent} not found for code {code}")]
    ParentNotFound {
        /// Code of the missing parent
        parent: String,
        /// Code being resolved
        code: String,
    },

    /// The parent's partner named by a `*rank` marker does not exist
    #[error("Partner parent {partner} not found for code {code}")]
    PartnerParentNotFound {
        /// Code of the missing partner of the parent
        partner: String,
        /// Code being resolved
        code: String,
    },

    /// The code does not follow the notation
    #[error("{0}")]
    MalformedCode(#[from] CodeError),

    /// Relation store failure
    #[error("Store error: {0}")]
    Store(String),
}

impl RelationError {
    /// True if the error must abort the whole batch
    pub fn is_fatal(&self) -> bool {
        matches!(self, RelationError::Store(_))
    }
}

/// Errors that abort an import batch
#[derive(Error, Debug)]
pub enum ImportError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV stream could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File exceeds the configured size limit
    #[error("File too large: {0} bytes (max: {1})")]
    FileTooLarge(u64, u64),

    /// Batch exceeds the configured row limit
    #[error("Too many rows: more than {0}")]
    TooManyRows(usize),

    /// Member or relation store failure
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
