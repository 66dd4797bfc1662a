//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{Member, MemberId, MemberIndex, NewMember, RelationEdge, RelationId, RelationType, Upserted};

/// Read-only lookup of members by code
///
/// Implemented by [`MemberIndex`]; relation resolution depends only on this.
pub trait MemberLookup {
    /// Find the member whose code is exactly `code`
    fn find_by_code(&self, code: &str) -> Option<MemberId>;
}

/// Trait for storing and retrieving members
///
/// Implemented by the infrastructure layer (kindred-store)
pub trait MemberStore {
    /// Error type for store operations
    type Error;

    /// Insert a member, or update the member that already has this code
    fn upsert_member(&mut self, member: NewMember) -> Result<Upserted<MemberId>, Self::Error>;

    /// Get a member by ID
    fn get_member(&self, id: MemberId) -> Result<Option<Member>, Self::Error>;

    /// Get a member by exact code
    fn find_member_by_code(&self, code: &str) -> Result<Option<Member>, Self::Error>;

    /// List members one page at a time
    fn list_members(&self, query: &MemberQuery) -> Result<MemberPage, Self::Error>;

    /// Snapshot every member code currently stored
    fn member_index(&self) -> Result<MemberIndex, Self::Error>;
}

/// Trait for storing and retrieving relation edges
///
/// Implemented by the infrastructure layer (kindred-store)
pub trait RelationStore {
    /// Error type for store operations
    type Error;

    /// Find the edge for an exact `(member1, member2, relation_type)` triple
    fn find_relation(
        &self,
        member1: MemberId,
        member2: MemberId,
        relation_type: RelationType,
    ) -> Result<Option<RelationEdge>, Self::Error>;

    /// Insert the edge, or overwrite the rank of the existing edge for the triple
    ///
    /// The lookup and the write form one atomic operation.
    fn upsert_relation(
        &mut self,
        member1: MemberId,
        member2: MemberId,
        relation_type: RelationType,
        rank: Option<u32>,
    ) -> Result<Upserted<RelationId>, Self::Error>;

    /// All edges where the member is either end
    fn relations_of(&self, member: MemberId) -> Result<Vec<RelationEdge>, Self::Error>;
}

/// Member column a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    /// Genealogy code
    #[default]
    Code,
    /// First name
    FirstName,
    /// Last name
    LastName,
    /// Birth date
    BirthDate,
}

impl SortField {
    /// Parse a field name as used by the listing API (`firstName`, ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "code" => Some(SortField::Code),
            "firstName" => Some(SortField::FirstName),
            "lastName" => Some(SortField::LastName),
            "birthDate" => Some(SortField::BirthDate),
            _ => None,
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// Query criteria for listing members
#[derive(Debug, Clone)]
pub struct MemberQuery {
    /// 1-based page number
    pub page: usize,

    /// Page size
    pub limit: usize,

    /// Sort column
    pub sort_by: SortField,

    /// Sort direction
    pub direction: SortDirection,

    /// Free-text filter over names, dates, contact, address and social network fields
    pub search: Option<String>,
}

impl MemberQuery {
    /// Rows to skip before this page
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1) * self.limit
    }
}

impl Default for MemberQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            sort_by: SortField::Code,
            direction: SortDirection::Ascending,
            search: None,
        }
    }
}

/// One page of members
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    /// Members on this page
    pub items: Vec<Member>,

    /// Total members matching the query
    pub total: usize,

    /// 1-based page number
    pub page: usize,

    /// Page size
    pub limit: usize,
}

impl MemberPage {
    /// Number of pages for the total
    pub fn total_pages(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}
