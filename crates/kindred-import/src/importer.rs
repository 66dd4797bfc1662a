//! Two-pass member import
//!
//! Pass 1 upserts every row as a member. Only then is a member index
//! snapshot taken, and Pass 2 resolves the relations of every imported code
//! against it in row order. A code may name a partner or parent whose row
//! comes later in the file; the snapshot makes that irrelevant.

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::resolver::RelationResolver;
use crate::rows::MemberRow;
use crate::types::ImportResult;
use kindred_domain::traits::{MemberStore, RelationStore};
use std::fmt::Display;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Imports member CSV files into a member and relation store
pub struct Importer<S> {
    store: S,
    config: ImportConfig,
}

impl<S> Importer<S>
where
    S: MemberStore + RelationStore,
    <S as MemberStore>::Error: Display,
    <S as RelationStore>::Error: Display,
{
    /// Create a new Importer
    pub fn new(store: S, config: ImportConfig) -> Result<Self, ImportError> {
        config.validate().map_err(ImportError::Config)?;
        Ok(Self { store, config })
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the importer, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Import a CSV file from disk
    pub fn import_path<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportResult, ImportError> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        if size > self.config.max_file_size_bytes {
            return Err(ImportError::FileTooLarge(size, self.config.max_file_size_bytes));
        }

        info!("Importing members from {}", path.display());
        self.import_reader(File::open(path)?)
    }

    /// Import CSV data from any reader
    ///
    /// All rows are read before anything is written, so a stream error or an
    /// oversized batch leaves the store untouched.
    pub fn import_reader<R: Read>(&mut self, reader: R) -> Result<ImportResult, ImportError> {
        let started = Instant::now();
        let mut result = ImportResult::new();
        let rows = self.read_rows(reader)?;

        info!(
            "Batch {}: read {} row(s)",
            result.batch_id,
            rows.len()
        );

        let codes = self.upsert_members(rows, &mut result)?;
        self.resolve_relations(&codes, &mut result)?;

        info!(
            "Batch {} complete in {} ms: {}",
            result.batch_id,
            started.elapsed().as_millis(),
            result.summary()
        );

        Ok(result)
    }

    fn read_rows<R: Read>(
        &self,
        reader: R,
    ) -> Result<Vec<Result<MemberRow, String>>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter_byte())
            .trim(if self.config.trim_fields {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(reader);

        let mut rows = Vec::new();
        for record in csv_reader.deserialize::<MemberRow>() {
            if rows.len() == self.config.max_rows {
                return Err(ImportError::TooManyRows(self.config.max_rows));
            }
            match record {
                Ok(row) => rows.push(Ok(row)),
                Err(e) if e.is_io_error() => return Err(ImportError::Csv(e)),
                Err(e) => rows.push(Err(format!("Unreadable row: {}", e))),
            }
        }

        Ok(rows)
    }

    /// Pass 1: create or update one member per row
    ///
    /// Returns `(line, code)` for every row that was written.
    fn upsert_members(
        &mut self,
        rows: Vec<Result<MemberRow, String>>,
        result: &mut ImportResult,
    ) -> Result<Vec<(usize, String)>, ImportError> {
        let mut codes = Vec::with_capacity(rows.len());

        for (line, row) in rows.into_iter().enumerate() {
            let member = match row.and_then(MemberRow::into_new_member) {
                Ok(member) => member,
                Err(message) => {
                    warn!("Line {}: {}", line, message);
                    result.push_error(line, message);
                    continue;
                }
            };

            let code = member.code.clone();
            let upserted = self
                .store
                .upsert_member(member)
                .map_err(|e| ImportError::Store(e.to_string()))?;

            debug!("Line {}: member {} {:?}", line, code, upserted.outcome);
            result.record_member(upserted.outcome);
            codes.push((line, code));
        }

        Ok(codes)
    }

    /// Pass 2: resolve relations of every written code against a full snapshot
    fn resolve_relations(
        &mut self,
        codes: &[(usize, String)],
        result: &mut ImportResult,
    ) -> Result<(), ImportError> {
        let members = self
            .store
            .member_index()
            .map_err(|e| ImportError::Store(e.to_string()))?;

        debug!("Member index holds {} code(s)", members.len());

        let mut resolver = RelationResolver::new(&mut self.store);
        for (line, code) in codes {
            match resolver.resolve(code, &members) {
                Ok(outcome) => result.record_relations(&outcome),
                Err(e) if e.is_fatal() => return Err(ImportError::Store(e.to_string())),
                Err(e) => {
                    warn!("Line {}: {}", line, e);
                    result.push_error(*line, e.to_string());
                }
            }
        }

        Ok(())
    }
}
