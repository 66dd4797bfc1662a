//! Kindred Domain Layer
//!
//! This crate contains the core model of the family tree and the genealogy
//! code notation. It defines the value objects and trait interfaces that all
//! other layers depend upon; its only dependency is `chrono` for dates.
//!
//! ## Key Concepts
//!
//! - **Member**: A person, identified in the tree by a code such as `0.1.3`
//! - **Code**: Dot-separated birth-order path with optional `+rank` partner
//!   suffix and `*rank` partner-origin marker
//! - **Relation edge**: Directed `Partner`, `Parent` or `Children` link
//! - **Member index**: Immutable code to member snapshot used between import passes
//!
//! ## Architecture
//!
//! - No infrastructure dependencies (only `chrono` for calendar dates)
//! - Pure business logic only
//! - Infrastructure implementations live in other crates
//! - Trait definitions for all external interactions

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod code;
pub mod index;
pub mod member;
pub mod relationship;
pub mod traits;

// Re-exports for convenience
pub use code::{CodeError, CodeKind, ParsedCode};
pub use index::MemberIndex;
pub use member::{
    Address, Member, MemberId, NewMember, SocialNetwork, SocialNetworkType, UpsertOutcome,
    Upserted,
};
pub use relationship::{RelationEdge, RelationId, RelationType};
