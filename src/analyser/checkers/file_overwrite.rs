//! File overwrite detection
//!
//! An extension file whose resolved install destination matches a file
//! shipped with the target release would replace it on installation.

use crate::analyser::checker::{Checker, CheckerContext};
use crate::model::{Conflict, ConflictKind, ResourceType};

pub struct FileOverwriteChecker;

impl Checker for FileOverwriteChecker {
    fn can_process(&self, ctx: &CheckerContext<'_>) -> bool {
        ctx.extension.has_resources_of(ResourceType::File)
            && ctx.target.has_resources_of(ResourceType::File)
    }

    fn check(&self, ctx: &CheckerContext<'_>) -> Vec<Conflict> {
        let by_destination = ctx.index.files_by_destination();
        let mut conflicts = Vec::new();

        for target_file in ctx.target.resources_of(ResourceType::File) {
            let Some(extension_files) = by_destination.get(target_file.id()) else {
                continue;
            };
            for extension_file in extension_files {
                conflicts.push(Conflict::paired(
                    ConflictKind::FileOverwrite,
                    (*extension_file).clone(),
                    target_file.clone(),
                    ctx.target_version,
                ));
            }
        }
        conflicts
    }
}
