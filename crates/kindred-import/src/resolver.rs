//! Relation resolution for a single member code
//!
//! Turns what a code says about its member into relation edges:
//!
//! ```text
//! 0.1+2      Partner(0.1 -> 0.1+2, rank 2)
//! 0.1.3      Parent(0.1 -> 0.1.3), Children(0.1.3 -> 0.1, rank 3)
//! 0.1.3*2    Parent(0.1+2 -> 0.1.3*2), Children(0.1.3*2 -> 0.1+2, rank 3)
//! ```
//!
//! Every edge goes through `RelationStore::upsert_relation`, so resolving the
//! same code again rewrites ranks instead of adding edges.

use crate::error::RelationError;
use crate::types::ResolveOutcome;
use kindred_domain::code::{is_root_code, partner_code};
use kindred_domain::traits::{MemberLookup, RelationStore};
use kindred_domain::{CodeKind, MemberId, ParsedCode, RelationType};
use std::fmt::Display;
use tracing::debug;

/// Derives and persists the relation edges implied by member codes
pub struct RelationResolver<'a, S>
where
    S: RelationStore,
{
    store: &'a mut S,
}

impl<'a, S> RelationResolver<'a, S>
where
    S: RelationStore,
    S::Error: Display,
{
    /// Create a resolver writing to `store`
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Resolve every relation implied by `code`
    ///
    /// `members` must already hold every member of the batch. The root code
    /// `0` and single-segment codes produce no edges. Every lookup happens
    /// before the first write, so a missing member leaves no edges behind.
    pub fn resolve<L>(&mut self, code: &str, members: &L) -> Result<ResolveOutcome, RelationError>
    where
        L: MemberLookup + ?Sized,
    {
        let mut outcome = ResolveOutcome::default();

        if is_root_code(code) {
            return Ok(outcome);
        }

        let member = members
            .find_by_code(code)
            .ok_or_else(|| RelationError::MemberNotFound(code.to_string()))?;

        match ParsedCode::parse(code)?.into_kind() {
            CodeKind::Root | CodeKind::Standalone => {
                debug!("Code {} has no ancestry to resolve", code);
            }
            CodeKind::Partner { base, rank } => {
                let base_member = members.find_by_code(&base).ok_or_else(|| {
                    RelationError::PartnerBaseNotFound {
                        base,
                        code: code.to_string(),
                    }
                })?;

                self.upsert(&mut outcome, base_member, member, RelationType::Partner, Some(rank))?;
            }
            CodeKind::Descendant {
                parent,
                rank,
                origin_partner,
            } => {
                let parent_member = members.find_by_code(&parent).ok_or_else(|| {
                    RelationError::ParentNotFound {
                        parent: parent.clone(),
                        code: code.to_string(),
                    }
                })?;

                let effective_parent = match origin_partner {
                    Some(partner_rank) => {
                        let partner = partner_code(&parent, partner_rank);
                        members.find_by_code(&partner).ok_or_else(|| {
                            RelationError::PartnerParentNotFound {
                                partner,
                                code: code.to_string(),
                            }
                        })?
                    }
                    None => parent_member,
                };

                self.upsert(&mut outcome, effective_parent, member, RelationType::Parent, None)?;
                self.upsert(&mut outcome, member, effective_parent, RelationType::Children, Some(rank))?;
            }
        }

        Ok(outcome)
    }

    fn upsert(
        &mut self,
        outcome: &mut ResolveOutcome,
        member1: MemberId,
        member2: MemberId,
        relation_type: RelationType,
        rank: Option<u32>,
    ) -> Result<(), RelationError> {
        let upserted = self
            .store
            .upsert_relation(member1, member2, relation_type, rank)
            .map_err(|e| RelationError::Store(e.to_string()))?;

        debug!(
            "{} {} -> {} (rank {:?}): {:?}",
            relation_type, member1, member2, rank, upserted.outcome
        );

        outcome.record(&upserted);
        Ok(())
    }
}
