//! Restricted bean class detection
//!
//! Beans instantiating classes from the platform's internal namespace are
//! flagged regardless of what the target release ships: the class being
//! internal is the problem, not its presence in one particular version.

use crate::analyser::checker::{Checker, CheckerContext};
use crate::model::{Conflict, ConflictKind, ResourceType};

pub struct BeanRestrictedClassChecker;

impl Checker for BeanRestrictedClassChecker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool {
        ctx.extension.has_resources_of(ResourceType::Bean)
    }

    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict> {
        ctx.index
            .restricted_beans()
            .iter()
            .map(|bean| {
                Conflict::extension_only(
                    ConflictKind::BeanRestrictedClass,
                    (*bean).clone(),
                    ctx.target_version,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::test_support::{context, report_of, test_config};
    use crate::model::Resource;

    #[test]
    fn test_internal_class_beans_flagged_per_version() {
        let extension = report_of(vec![
            Resource::bean("a", "ctx.xml@/ext.amp", Some("org.acme.repo.Node".into())),
            Resource::bean("b", "ctx.xml@/ext.amp", Some("com.vendor.Lib".into())),
        ]);
        let target = report_of(vec![]);
        let config = test_config();
        let (index, deps) = context(&extension, &config);
        let ctx = CheckerContext {
            extension: &extension,
            target: &target,
            index: &index,
            dependencies: &deps,
            config: &config,
            target_version: "6.0.0",
        };

        let conflicts = BeanRestrictedClassChecker.check(&ctx);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].extension_resource.id(), "a");
        assert_eq!(conflicts[0].target_version, "6.0.0");
        assert!(conflicts[0].target_resource.is_none());
    }

    #[test]
    fn test_allowlisted_class_is_skipped() {
        let extension = report_of(vec![Resource::bean(
            "a",
            "ctx.xml@/ext.amp",
            Some("org.acme.repo.Node".into()),
        )]);
        let target = report_of(vec![]);
        let mut config = test_config();
        config
            .restricted_class_allowlist
            .insert("org.acme.repo.Node".to_string());
        let (index, deps) = context(&extension, &config);
        let ctx = CheckerContext {
            extension: &extension,
            target: &target,
            index: &index,
            dependencies: &deps,
            config: &config,
            target_version: "6.0.0",
        };

        assert!(BeanRestrictedClassChecker.check(&ctx).is_empty());
    }
}
