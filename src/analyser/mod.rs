//! Conflict analysis: configuration, resource views, checkers, orchestration

pub mod checker;
pub mod checkers;
pub mod comparator;
pub mod config;
pub mod index;
pub mod store;

pub use comparator::{AnalysisOutcome, GroupedConflicts, find_conflicts};
pub use config::{AnalyserConfig, compile_file_mappings, load_allowlist};
pub use store::{DirInventoryStore, TargetInventoryStore};
