//! Analyse command implementation
//!
//! Ties the pipeline together: extract the extension inventory, open the
//! baseline store, resolve the requested versions, run the checker set and
//! render the report. Returns whether any conflict was found so the caller
//! can pick the exit code.

use tracing::info;

use crate::analyser::{
    AnalyserConfig, DirInventoryStore, TargetInventoryStore, compile_file_mappings,
    find_conflicts, load_allowlist,
};
use crate::cli::AnalyseArgs;
use crate::error::{ExtcheckError, Result};
use crate::inventory::{ArchiveKind, ExtractorConfig, extract_inventory};
use crate::model::ResourceType;
use crate::report;
use crate::version::resolve_version_specs;

/// Run analyse command. `Ok(true)` means conflicts were found.
pub fn run(args: AnalyseArgs) -> Result<bool> {
    let archive_kind = ArchiveKind::from_path(&args.archive)?;
    if archive_kind == ArchiveKind::War {
        // Wars are baselines, not extensions.
        return Err(ExtcheckError::UnsupportedArchiveType {
            path: args.archive.display().to_string(),
        });
    }

    let store = DirInventoryStore::open(&args.store)?;
    let versions = resolve_version_specs(&args.target_versions, store.known_versions())?;
    info!(
        archive = %args.archive.display(),
        versions = versions.len(),
        "analysing extension"
    );

    let extractor_config = ExtractorConfig {
        internal_package_prefix: Some(args.internal_prefix.clone()),
        public_api_annotation: None,
        version: None,
    };
    let extension = extract_inventory(&args.archive, &extractor_config)?;

    let config = AnalyserConfig {
        internal_package_prefix: args.internal_prefix,
        bean_override_allowlist: load_allowlist(args.bean_override_allowlist.as_deref())?,
        restricted_class_allowlist: load_allowlist(args.restricted_class_allowlist.as_deref())?,
        file_mappings: compile_file_mappings(
            &args.archive,
            archive_kind,
            extension.report.resources_of(ResourceType::File),
        ),
    };

    let outcome = find_conflicts(&extension, &store, &versions, &config)?;

    if args.json {
        println!("{}", report::render_json(&outcome)?);
    } else {
        print!("{}", report::render_text(&outcome));
    }

    Ok(outcome.has_conflicts())
}
