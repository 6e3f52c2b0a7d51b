//! Platform version ordering, range resolution and range compaction
//!
//! Platform versions are dot-separated numeric components compared
//! numerically per component (`6.0.10` > `6.0.9`), not lexically. Four-part
//! versions such as `6.0.0.2` are valid, which rules out strict semver
//! parsing here.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::{ExtcheckError, Result};

/// A parsed platform version, ordered numerically per component.
///
/// Shorter versions compare as if zero-padded: `6.0` == `6.0.0` for ordering
/// purposes (the raw string still disambiguates catalog membership).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformVersion {
    components: Vec<u64>,
}

impl PlatformVersion {
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        let components = s
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<u64>>>()?;
        Some(PlatformVersion { components })
    }
}

impl PartialOrd for PlatformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlatformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

/// Total order over raw version strings: numeric where both sides parse,
/// unparsable versions sort last (and lexically among themselves) so a
/// malformed catalog entry cannot panic the compactor.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (PlatformVersion::parse(a), PlatformVersion::parse(b)) {
        (Some(va), Some(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Sort version strings ascending by numeric comparison.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// Resolve the CLI `--target-version` specs against the known catalog.
///
/// Each spec is either a single version (must be a known catalog entry) or
/// an inclusive range `A-B` expanded to every known version within the
/// bounds. No specs at all selects the whole catalog. The result is sorted
/// ascending and deduplicated.
pub fn resolve_version_specs(specs: &[String], catalog: &[String]) -> Result<Vec<String>> {
    if specs.is_empty() {
        return Ok(catalog.to_vec());
    }

    let mut selected: BTreeSet<&String> = BTreeSet::new();
    for spec in specs {
        if let Some((low, high)) = spec.split_once('-') {
            let low = PlatformVersion::parse(low.trim())
                .ok_or_else(|| ExtcheckError::InvalidVersionSpec { spec: spec.clone() })?;
            let high = PlatformVersion::parse(high.trim())
                .ok_or_else(|| ExtcheckError::InvalidVersionSpec { spec: spec.clone() })?;

            let matched: Vec<&String> = catalog
                .iter()
                .filter(|v| {
                    PlatformVersion::parse(v).is_some_and(|pv| pv >= low && pv <= high)
                })
                .collect();
            if matched.is_empty() {
                return Err(ExtcheckError::InvalidVersionSpec { spec: spec.clone() });
            }
            selected.extend(matched);
        } else {
            let version = catalog
                .iter()
                .find(|v| v.as_str() == spec.as_str())
                .ok_or_else(|| ExtcheckError::UnknownTargetVersion {
                    version: spec.clone(),
                })?;
            selected.insert(version);
        }
    }

    let mut resolved: Vec<String> = selected.into_iter().cloned().collect();
    sort_versions(&mut resolved);
    Ok(resolved)
}

/// Compact a set of affected versions into minimal contiguous ranges.
///
/// Contiguity is defined against the full ordered catalog, not against the
/// affected subset: a known-but-unaffected version in between breaks a run
/// even when the affected versions are numerically adjacent. Runs of length
/// one render as the bare version, longer runs as `"first - last"`, joined
/// ascending with `", "`. `catalog` must already be in ascending order.
pub fn compact_version_ranges(affected: &BTreeSet<String>, catalog: &[String]) -> String {
    let mut ranges: Vec<String> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for version in catalog {
        if affected.contains(version) {
            run.push(version);
        } else {
            flush_run(&mut ranges, &mut run);
        }
    }
    flush_run(&mut ranges, &mut run);

    ranges.join(", ")
}

fn flush_run(ranges: &mut Vec<String>, run: &mut Vec<&str>) {
    match run.as_slice() {
        [] => {}
        [only] => ranges.push((*only).to_string()),
        [first, .., last] => ranges.push(format!("{first} - {last}")),
    }
    run.clear();
}
