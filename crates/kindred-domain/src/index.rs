//! Member-by-code index
//!
//! An immutable snapshot of `code -> MemberId`, taken once every member of a
//! batch has been written. Relation resolution only ever looks members up
//! through a snapshot, so it cannot observe a half-imported batch.

use crate::traits::MemberLookup;
use crate::MemberId;
use std::collections::HashMap;

/// Immutable code to member id mapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberIndex {
    by_code: HashMap<String, MemberId>,
}

impl MemberIndex {
    /// Build an index from `(code, id)` pairs
    ///
    /// When a code appears more than once the last pair wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use kindred_domain::{MemberId, MemberIndex};
    /// use kindred_domain::traits::MemberLookup;
    ///
    /// let index = MemberIndex::from_pairs([("0".to_string(), MemberId::from_value(1))]);
    /// assert_eq!(index.find_by_code("0"), Some(MemberId::from_value(1)));
    /// assert_eq!(index.find_by_code("0.1"), None);
    /// ```
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, MemberId)>,
    {
        Self {
            by_code: pairs.into_iter().collect(),
        }
    }

    /// Number of indexed members
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    /// True if no member is indexed
    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }

    /// True if `code` is indexed
    pub fn contains(&self, code: &str) -> bool {
        self.by_code.contains_key(code)
    }
}

impl MemberLookup for MemberIndex {
    fn find_by_code(&self, code: &str) -> Option<MemberId> {
        self.by_code.get(code).copied()
    }
}
