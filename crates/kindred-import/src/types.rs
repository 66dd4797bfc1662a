//! Result types for an import batch

use kindred_domain::{UpsertOutcome, Upserted};
use serde::Serialize;
use uuid::Uuid;

/// A problem with one row of the batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineError {
    /// Zero-based data row index (header excluded)
    pub line: usize,

    /// What went wrong
    pub message: String,
}

/// Edges written while resolving one code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveOutcome {
    /// Edges inserted
    pub created: usize,

    /// Existing edges whose rank was overwritten
    pub updated: usize,
}

impl ResolveOutcome {
    pub(crate) fn record<I>(&mut self, upserted: &Upserted<I>) {
        match upserted.outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }

    /// True if no edge was written
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.updated == 0
    }
}

/// Running totals of an import batch
///
/// Owned by the caller; the importer only increments counters and appends
/// errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Identifier of this batch, for log correlation
    pub batch_id: Uuid,

    /// Members inserted
    pub members_created: usize,

    /// Existing members updated
    pub members_updated: usize,

    /// Relation edges inserted
    pub relations_created: usize,

    /// Existing relation edges updated
    pub relations_updated: usize,

    /// Row-level problems, in the order they were found
    pub errors: Vec<LineError>,
}

impl ImportResult {
    /// Empty result with a fresh UUIDv7 batch id
    pub fn new() -> Self {
        Self {
            batch_id: Uuid::now_v7(),
            members_created: 0,
            members_updated: 0,
            relations_created: 0,
            relations_updated: 0,
            errors: Vec::new(),
        }
    }

    /// Count a member upsert
    pub fn record_member(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.members_created += 1,
            UpsertOutcome::Updated => self.members_updated += 1,
        }
    }

    /// Count the edges written for one code
    pub fn record_relations(&mut self, outcome: &ResolveOutcome) {
        self.relations_created += outcome.created;
        self.relations_updated += outcome.updated;
    }

    /// Append a row-level error
    pub fn push_error(&mut self, line: usize, message: impl Into<String>) {
        self.errors.push(LineError {
            line,
            message: message.into(),
        });
    }

    /// True if any row failed
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line summary for logs
    pub fn summary(&self) -> String {
        format!(
            "members: {} created, {} updated; relations: {} created, {} updated; {} error(s)",
            self.members_created,
            self.members_updated,
            self.relations_created,
            self.relations_updated,
            self.errors.len()
        )
    }
}

impl Default for ImportResult {
    fn default() -> Self {
        Self::new()
    }
}
