//! Command implementations

pub mod analyse;
pub mod completions;
pub mod inventory;
pub mod list_versions;
pub mod version;
