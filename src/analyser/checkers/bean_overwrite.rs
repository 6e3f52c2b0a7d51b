//! Bean overwrite detection
//!
//! An extension bean whose id matches a bean shipped with the target release
//! silently replaces it at startup. Every (extension instance, target
//! instance) pair with the same id is a distinct conflict: the defining
//! objects tell the user exactly which definitions collide.

use crate::analyser::checker::{Checker, CheckerContext};
use crate::model::{Conflict, ConflictKind, ResourceType};

pub struct BeanOverwriteChecker;

impl Checker for BeanOverwriteChecker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool {
        ctx.extension.has_resources_of(ResourceType::Bean)
            && ctx.target.has_resources_of(ResourceType::Bean)
    }

    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict> {
        let candidates = ctx.index.bean_overrides_by_id();
        let mut conflicts = Vec::new();

        for target_bean in ctx.target.resources_of(ResourceType::Bean) {
            let Some(extension_beans) = candidates.get(target_bean.id()) else {
                continue;
            };
            for extension_bean in extension_beans {
                conflicts.push(Conflict::paired(
                    ConflictKind::BeanOverwrite,
                    (*extension_bean).clone(),
                    target_bean.clone(),
                    ctx.target_version,
                ));
            }
        }

        conflicts
    }
}
