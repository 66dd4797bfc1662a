//! Command implementations.

pub mod import;
pub mod members;
pub mod relations;

pub use self::import::execute_import;
pub use self::members::execute_members;
pub use self::relations::execute_relations;
