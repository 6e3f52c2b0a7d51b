//! Conflict report rendering
//!
//! Renders an aggregated analysis outcome either as human-readable text
//! grouped by conflict kind, or as JSON for tooling. Version lists are
//! compacted into contiguous ranges relative to the store's full version
//! catalog, so "every version from 6.0.0 to 6.0.5" reads as one range
//! instead of six lines, while a known-but-unaffected version in between
//! still splits the range.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use console::Style;
use serde::Serialize;

use crate::analyser::AnalysisOutcome;
use crate::model::Conflict;
use crate::version::compact_version_ranges;

/// Render the outcome as the human-readable conflict report.
pub fn render_text(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    let bold = Style::new().bold();
    let header_style = Style::new().bold().yellow();

    if !outcome.has_conflicts() {
        let _ = writeln!(
            out,
            "No conflicts found across {} target version(s).",
            outcome.versions_analysed.len()
        );
        return out;
    }

    for (kind, by_id) in &outcome.conflicts {
        if by_id.is_empty() {
            continue;
        }
        let _ = writeln!(out, "{}", header_style.apply_to(kind.header()));
        let _ = writeln!(out);

        for (id, conflicts) in by_id {
            let affected: BTreeSet<String> = conflicts
                .iter()
                .map(|c| c.target_version.clone())
                .collect();
            let ranges = compact_version_ranges(&affected, &outcome.catalog);

            let _ = writeln!(out, "  {}", bold.apply_to(id));
            let _ = writeln!(out, "    defined in: {}", defining_objects(conflicts));
            let dependencies = dependency_union(conflicts);
            if !dependencies.is_empty() {
                let _ = writeln!(
                    out,
                    "    invalid dependencies: {}",
                    join(dependencies.iter())
                );
            }
            let _ = writeln!(
                out,
                "    conflicting versions: {} ({} conflict(s))",
                ranges,
                conflicts.len()
            );
            let _ = writeln!(out);
        }
    }

    let _ = writeln!(
        out,
        "{}",
        bold.apply_to(format!(
            "Found {} conflict(s) across {} target version(s).",
            outcome.total_conflicts(),
            outcome.versions_analysed.len()
        ))
    );
    out
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    target_versions: &'a [String],
    total_conflicts: usize,
    conflicts: &'a crate::analyser::GroupedConflicts,
}

/// Render the outcome as pretty-printed JSON.
pub fn render_json(outcome: &AnalysisOutcome) -> crate::error::Result<String> {
    let report = JsonReport {
        target_versions: &outcome.versions_analysed,
        total_conflicts: outcome.total_conflicts(),
        conflicts: &outcome.conflicts,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn defining_objects(conflicts: &BTreeSet<Conflict>) -> String {
    let objects: BTreeSet<&str> = conflicts
        .iter()
        .map(|c| c.extension_resource.defining_object())
        .collect();
    join(objects.into_iter())
}

/// Union of the matched dependency ids; empty for non-usage kinds.
fn dependency_union(conflicts: &BTreeSet<Conflict>) -> BTreeSet<&String> {
    conflicts.iter().flat_map(|c| &c.dependencies).collect()
}

fn join<S: AsRef<str>>(items: impl Iterator<Item = S>) -> String {
    items
        .map(|s| s.as_ref().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
