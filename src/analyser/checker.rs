//! Checker trait and per-version execution context

use crate::analyser::config::AnalyserConfig;
use crate::analyser::index::ResourceIndex;
use crate::inventory::DependencyMap;
use crate::model::{Conflict, InventoryReport};

/// Everything one checker needs for one extension/target-version pair.
pub struct CheckerContext<'a> {
    pub extension: &'a InventoryReport,
    pub target: &'a InventoryReport,
    pub index: &'a ResourceIndex<'a>,
    /// Classpath-element id -> union of referenced class ids, across every
    /// instance of that element in the extension.
    pub dependencies: &'a DependencyMap,
    pub config: &'a AnalyserConfig,
    pub target_version: &'a str,
}

/// One conflict family detector.
///
/// `can_process` is a cheap structural pre-check; a checker whose inputs are
/// structurally absent is skipped without logging. `check` must be pure:
/// same context, same conflicts.
pub trait Checker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool;
    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict>;
}

/// The full checker set, in report order.
pub fn checker_set() -> Vec<Box<dyn Checker>> {
    use crate::analyser::checkers::{
        BeanOverwriteChecker, BeanRestrictedClassChecker, ClasspathElementChecker,
        CustomCodeUsageChecker, FileOverwriteChecker, ThirdPartyLibraryUsageChecker,
    };
    vec![
        Box::new(BeanOverwriteChecker),
        Box::new(BeanRestrictedClassChecker),
        Box::new(ClasspathElementChecker),
        Box::new(CustomCodeUsageChecker),
        Box::new(FileOverwriteChecker),
        Box::new(ThirdPartyLibraryUsageChecker),
    ]
}
