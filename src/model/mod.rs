//! Core data model: resources, conflicts and inventory reports
//!
//! Everything in this module is plain immutable data. Resources are created
//! once during archive extraction, conflicts once per checker invocation per
//! target version; neither is ever mutated afterwards.

mod conflict;
mod report;
mod resource;

pub use conflict::{Conflict, ConflictKind};
pub use report::InventoryReport;
pub use resource::{Resource, ResourceType};
