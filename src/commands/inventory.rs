//! Inventory command implementation
//!
//! Extracts the classified resource inventory of one archive and emits it as
//! JSON, either to stdout or to a file. Baseline (war) reports should carry
//! a `--version` tag so the analyse command can key them in its store.

use tracing::info;

use crate::cli::InventoryArgs;
use crate::error::{ExtcheckError, Result};
use crate::inventory::{ExtractorConfig, extract_inventory};

/// Run inventory command
pub fn run(args: InventoryArgs) -> Result<()> {
    let config = ExtractorConfig {
        internal_package_prefix: Some(args.internal_prefix),
        public_api_annotation: Some(args.public_api_annotation),
        version: args.version,
    };

    let extracted = extract_inventory(&args.archive, &config)?;
    let json = serde_json::to_string_pretty(&extracted.report)?;

    match args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).map_err(|e| ExtcheckError::ReportWriteFailed {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?;
            }
            std::fs::write(&path, json).map_err(|e| ExtcheckError::ReportWriteFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
            info!(report = %path.display(), "inventory report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}
