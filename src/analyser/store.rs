//! Target inventory store
//!
//! Analyses run against previously generated inventory reports of the
//! baseline releases, not against the release archives themselves. A store
//! is any source of version-tagged reports; the directory store reads every
//! `*.json` under a directory tree.

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{ExtcheckError, Result, store_read_failed};
use crate::model::InventoryReport;

/// A catalog of target release inventories keyed by version.
pub trait TargetInventoryStore {
    /// Known versions, ascending.
    fn known_versions(&self) -> &[String];

    fn lookup(&self, version: &str) -> Result<&InventoryReport>;
}

/// Store backed by a directory tree of version-tagged JSON reports.
#[derive(Debug)]
pub struct DirInventoryStore {
    versions: Vec<String>,
    reports: HashMap<String, InventoryReport>,
}

impl DirInventoryStore {
    /// Load every `*.json` report under `dir`. Unreadable or untagged
    /// reports and duplicate version tags are fatal: a silently thinner
    /// catalog would mean silently thinner analysis results.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(ExtcheckError::StoreNotFound {
                path: dir.display().to_string(),
            });
        }

        let mut reports: HashMap<String, InventoryReport> = HashMap::new();
        for entry in WalkDir::new(dir).min_depth(1) {
            let entry =
                entry.map_err(|e| store_read_failed(dir.display().to_string(), e.to_string()))?;
            if !entry.file_type().is_file()
                || entry.path().extension().is_none_or(|ext| ext != "json")
            {
                continue;
            }

            let path = entry.path().display().to_string();
            debug!(report = path.as_str(), "loading target inventory");
            let content = std::fs::read_to_string(entry.path())
                .map_err(|e| store_read_failed(&path, e.to_string()))?;
            let report: InventoryReport = serde_json::from_str(&content)
                .map_err(|e| store_read_failed(&path, e.to_string()))?;

            let Some(version) = report.version.clone() else {
                return Err(ExtcheckError::StoreUntaggedReport { path });
            };
            if reports.insert(version.clone(), report).is_some() {
                return Err(ExtcheckError::StoreDuplicateVersion { version });
            }
        }

        let mut versions: Vec<String> = reports.keys().cloned().collect();
        crate::version::sort_versions(&mut versions);

        Ok(DirInventoryStore { versions, reports })
    }
}

impl TargetInventoryStore for DirInventoryStore {
    fn known_versions(&self) -> &[String] {
        &self.versions
    }

    fn lookup(&self, version: &str) -> Result<&InventoryReport> {
        self.reports
            .get(version)
            .ok_or_else(|| ExtcheckError::UnknownTargetVersion {
                version: version.to_string(),
            })
    }
}
