//! Relationship module - directed, typed edges between members
//!
//! A parent/child pair is stored as two edges: `Parent` from the parent to
//! the child (no rank) and `Children` from the child to the parent, ranked by
//! birth order. A partnership is a single `Partner` edge from the member to
//! its partner, ranked among that member's partners.

use super::MemberId;
use std::fmt;

/// Store-assigned identifier of a relation edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RelationId(i64);

impl RelationId {
    /// Wrap a raw row id
    pub fn from_value(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw row id
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type of relation between two members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// member2 is a partner of member1
    Partner,

    /// member1 is a parent of member2
    Parent,

    /// member1 is a child of member2
    Children,
}

impl RelationType {
    /// Get the relation type name as stored
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Partner => "partner",
            RelationType::Parent => "parent",
            RelationType::Children => "children",
        }
    }

    /// Parse a stored relation type name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "partner" => Some(RelationType::Partner),
            "parent" => Some(RelationType::Parent),
            "children" => Some(RelationType::Children),
            _ => None,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A directed relation between two members
///
/// At most one edge exists per `(member1, member2, relation_type)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationEdge {
    /// Unique identifier
    pub id: RelationId,

    /// Source member
    pub member1: MemberId,

    /// Target member
    pub member2: MemberId,

    /// Type of relation
    pub relation_type: RelationType,

    /// Partner rank or birth-order rank, depending on the type
    pub rank: Option<u32>,
}

impl RelationEdge {
    /// The member on the other end of this edge, seen from `member`
    pub fn counterpart(&self, member: MemberId) -> Option<MemberId> {
        if self.member1 == member {
            Some(self.member2)
        } else if self.member2 == member {
            Some(self.member1)
        } else {
            None
        }
    }
}
