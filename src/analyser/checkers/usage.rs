//! Dependency usage detection
//!
//! Both checkers resolve the classes each extension classpath element
//! references against the target release's classpath, then split the matches
//! by namespace: internal platform classes outside the published public API
//! are custom-code usage, everything outside the platform namespace is
//! third-party library usage. Matching is exact and case-sensitive, the way
//! a classloader resolves names.
//!
//! Conflicts are produced per element instance: the same class bundled in
//! two extension libraries yields two conflicts, one per defining object.

use std::collections::{BTreeSet, HashSet};

use crate::analyser::checker::{Checker, CheckerContext};
use crate::model::{Conflict, ConflictKind, ResourceType};

/// Usage of internal platform classes not covered by the public API.
pub struct CustomCodeUsageChecker;

/// Usage of third-party libraries bundled with the target release.
pub struct ThirdPartyLibraryUsageChecker;

impl Checker for CustomCodeUsageChecker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool {
        both_sides_have_classpath(ctx)
    }

    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict> {
        let prefix = ctx.config.internal_path_prefix();
        let public_api = public_api_class_ids(ctx);
        usage_conflicts(ctx, ConflictKind::CustomCodeUsage, |dependency| {
            dependency.starts_with(&prefix) && !public_api.contains(dependency)
        })
    }
}

impl Checker for ThirdPartyLibraryUsageChecker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool {
        both_sides_have_classpath(ctx)
    }

    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict> {
        let prefix = ctx.config.internal_path_prefix();
        usage_conflicts(ctx, ConflictKind::ThirdPartyLibraryUsage, |dependency| {
            !dependency.starts_with(&prefix)
        })
    }
}

fn both_sides_have_classpath(ctx: &CheckerContext<'_>) -> bool {
    ctx.extension.has_resources_of(ResourceType::ClasspathElement)
        && ctx.target.has_resources_of(ResourceType::ClasspathElement)
}

/// The target release's public API surface in classpath-id form:
/// `org.acme.Api` -> `/org/acme/Api.class`. Deprecated API classes still
/// count as covered.
fn public_api_class_ids(ctx: &CheckerContext<'_>) -> HashSet<String> {
    ctx.target
        .resources_of(ResourceType::PublicApiClass)
        .iter()
        .map(|r| format!("/{}.class", r.id().replace('.', "/")))
        .collect()
}

fn usage_conflicts(
    ctx: &CheckerContext<'_>,
    kind: ConflictKind,
    relevant: impl Fn(&str) -> bool,
) -> Vec<Conflict> {
    let target_ids: HashSet<&str> = ctx
        .target
        .resources_of(ResourceType::ClasspathElement)
        .iter()
        .map(|r| r.id())
        .collect();

    let mut conflicts = Vec::new();
    for instances in ctx.index.classpath_elements_by_id().values() {
        for element in instances {
            let Some(dependencies) = ctx.dependencies.get(element.id()) else {
                continue;
            };
            let matched: BTreeSet<String> = dependencies
                .iter()
                .filter(|d| target_ids.contains(d.as_str()) && relevant(d))
                .cloned()
                .collect();
            if !matched.is_empty() {
                conflicts.push(Conflict::usage(
                    kind,
                    (*element).clone(),
                    matched,
                    ctx.target_version,
                ));
            }
        }
    }
    conflicts
}
