//! Per-version analysis orchestration and conflict aggregation
//!
//! Runs the whole checker set once per selected target version and folds
//! the results into a kind -> resource id -> conflict-set structure ready
//! for rendering. Aggregation goes through sets keyed on conflict identity,
//! so feeding the same version twice cannot inflate the totals.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::analyser::checker::{CheckerContext, checker_set};
use crate::analyser::config::AnalyserConfig;
use crate::analyser::index::ResourceIndex;
use crate::analyser::store::TargetInventoryStore;
use crate::error::Result;
use crate::inventory::ExtractedInventory;
use crate::model::{Conflict, ConflictKind};

/// Conflicts grouped by kind, then by extension resource id.
pub type GroupedConflicts = BTreeMap<ConflictKind, BTreeMap<String, BTreeSet<Conflict>>>;

/// The aggregated result of one analysis run.
#[derive(Debug)]
pub struct AnalysisOutcome {
    pub conflicts: GroupedConflicts,
    /// Versions actually analysed, ascending.
    pub versions_analysed: Vec<String>,
    /// Every version the store knows, ascending. Range compaction in the
    /// report is relative to this full catalog, not to the analysed subset:
    /// a known-but-unselected version must still break a range.
    pub catalog: Vec<String>,
}

impl AnalysisOutcome {
    pub fn total_conflicts(&self) -> usize {
        self.conflicts
            .values()
            .flat_map(BTreeMap::values)
            .map(BTreeSet::len)
            .sum()
    }

    pub fn has_conflicts(&self) -> bool {
        self.conflicts.values().any(|by_id| !by_id.is_empty())
    }
}

/// Run every checker against every selected target version.
///
/// An unknown version is fatal before any checking starts, so a typo in a
/// version list cannot produce a partial report that looks complete.
pub fn find_conflicts(
    extension: &ExtractedInventory,
    store: &dyn TargetInventoryStore,
    versions: &[String],
    config: &AnalyserConfig,
) -> Result<AnalysisOutcome> {
    for version in versions {
        store.lookup(version)?;
    }

    let index = ResourceIndex::new(&extension.report, config);
    let checkers = checker_set();
    let mut conflicts: GroupedConflicts = BTreeMap::new();

    for version in versions {
        let target = store.lookup(version)?;
        let ctx = CheckerContext {
            extension: &extension.report,
            target,
            index: &index,
            dependencies: &extension.dependencies,
            config,
            target_version: version,
        };

        let mut found = 0usize;
        for checker in &checkers {
            if !checker.can_process(&ctx) {
                continue;
            }
            for conflict in checker.check(&ctx) {
                found += 1;
                conflicts
                    .entry(conflict.kind)
                    .or_default()
                    .entry(conflict.extension_resource.id().to_string())
                    .or_default()
                    .insert(conflict);
            }
        }
        debug!(version = version.as_str(), conflicts = found, "version analysed");
    }

    info!(
        versions = versions.len(),
        "analysis finished against {} target version(s)",
        versions.len()
    );

    Ok(AnalysisOutcome {
        conflicts,
        versions_analysed: versions.to_vec(),
        catalog: store.known_versions().to_vec(),
    })
}
