//! Classpath collision detection
//!
//! Two classpath elements with the same id end up shadowing each other once
//! the extension is installed; which one wins depends on classloader order
//! and is never safe to rely on. Every (extension instance, target instance)
//! id match is reported, including the degenerate case where both sides name
//! the same bundled library.

use std::collections::BTreeMap;

use crate::analyser::checker::{Checker, CheckerContext};
use crate::model::{Conflict, ConflictKind, Resource, ResourceType};

pub struct ClasspathElementChecker;

impl Checker for ClasspathElementChecker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool {
        ctx.extension.has_resources_of(ResourceType::ClasspathElement)
            && ctx.target.has_resources_of(ResourceType::ClasspathElement)
    }

    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict> {
        let extension_elements = ctx.index.classpath_elements_by_id();

        let mut target_by_id: BTreeMap<&str, Vec<&Resource>> = BTreeMap::new();
        for element in ctx.target.resources_of(ResourceType::ClasspathElement) {
            target_by_id.entry(element.id()).or_default().push(element);
        }

        let mut conflicts = Vec::new();
        for (id, extension_instances) in extension_elements {
            let Some(target_instances) = target_by_id.get(id) else {
                continue;
            };
            for extension_element in extension_instances {
                for target_element in target_instances {
                    conflicts.push(Conflict::paired(
                        ConflictKind::ClasspathElement,
                        (*extension_element).clone(),
                        (*target_element).clone(),
                        ctx.target_version,
                    ));
                }
            }
        }
        conflicts
    }
}
