//! Analyser configuration: allow-lists, file mappings, namespace settings
//!
//! One explicit, strongly-typed configuration struct shared by reference
//! with every checker. Loading failures here are fatal: an under-loaded
//! allow-list would silently under-report real conflicts.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{info, warn};
use zip::ZipArchive;

use crate::error::{Result, allowlist_read_failed};
use crate::inventory::ArchiveKind;
use crate::model::Resource;

/// Name of the mapping properties files an extension may ship to redirect
/// its install layout.
pub const FILE_MAPPING_NAME: &str = "file-mapping.properties";

/// Property key that controls whether the built-in mappings stay active.
const INCLUDE_DEFAULT_KEY: &str = "include.default";

/// Built-in source -> destination mappings applied to amp archives.
const DEFAULT_AMP_MAPPINGS: &[(&str, &str)] = &[
    ("/config", "/WEB-INF/classes"),
    ("/lib", "/WEB-INF/lib"),
    ("/licenses", "/WEB-INF/licenses"),
    ("/web/jsp", "/jsp"),
    ("/web/css", "/css"),
    ("/web/images", "/images"),
    ("/web/scripts", "/scripts"),
];

/// Runtime configuration consumed by the checker set.
#[derive(Debug, Clone)]
pub struct AnalyserConfig {
    /// Dotted package prefix of the platform's internal code, e.g.
    /// `org.acme`.
    pub internal_package_prefix: String,
    /// Bean ids exempt from the overwrite check.
    pub bean_override_allowlist: BTreeSet<String>,
    /// Bean classes exempt from the restricted-class check.
    pub restricted_class_allowlist: BTreeSet<String>,
    /// Source -> destination path-prefix mappings for install destinations.
    pub file_mappings: BTreeMap<String, String>,
}

impl AnalyserConfig {
    /// The internal package prefix in classpath-id form: `org.acme` ->
    /// `/org/acme/`.
    pub fn internal_path_prefix(&self) -> String {
        format!("/{}/", self.internal_package_prefix.replace('.', "/"))
    }
}

/// Load an allow-list file: a JSON array of strings. `None` means the
/// built-in default (empty).
pub fn load_allowlist(path: Option<&Path>) -> Result<BTreeSet<String>> {
    let Some(path) = path else {
        return Ok(BTreeSet::new());
    };
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path)
        .map_err(|e| allowlist_read_failed(&display, e.to_string()))?;
    let entries: Vec<String> = serde_json::from_str(&content)
        .map_err(|e| allowlist_read_failed(&display, e.to_string()))?;
    Ok(entries.into_iter().collect())
}

/// Compile the file mapping table for an extension archive.
///
/// Amp archives start from the built-in mappings, optionally extended or
/// replaced (`include.default=false`) by `file-mapping.properties` entries
/// shipped inside the archive. Jar extensions have no mapped layout.
pub fn compile_file_mappings(
    archive_path: &Path,
    archive_kind: ArchiveKind,
    file_resources: &[Resource],
) -> BTreeMap<String, String> {
    if archive_kind != ArchiveKind::Amp {
        return BTreeMap::new();
    }

    let mut include_default = true;
    let mut custom: BTreeMap<String, String> = BTreeMap::new();

    let mapping_entries: Vec<&Resource> = file_resources
        .iter()
        .filter(|r| r.id().contains(FILE_MAPPING_NAME))
        .collect();

    if mapping_entries.is_empty() {
        info!("no {FILE_MAPPING_NAME} in the extension, using the default mappings");
    } else {
        match read_mapping_properties(archive_path, &mapping_entries) {
            Ok(properties) => {
                for (key, value) in properties {
                    if key == INCLUDE_DEFAULT_KEY {
                        include_default = value.trim() != "false";
                    } else {
                        custom.insert(key, value);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "failed to read {FILE_MAPPING_NAME}, using the default mappings");
            }
        }
    }

    let mut mappings = BTreeMap::new();
    if include_default {
        for (source, destination) in DEFAULT_AMP_MAPPINGS {
            mappings.insert((*source).to_string(), (*destination).to_string());
        }
    }
    mappings.extend(custom);
    mappings
}

fn read_mapping_properties(
    archive_path: &Path,
    mapping_entries: &[&Resource],
) -> std::io::Result<Vec<(String, String)>> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut properties = Vec::new();
    for resource in mapping_entries {
        // resource ids carry a leading slash the zip directory does not
        let entry_name = resource.id().trim_start_matches('/').to_string();
        let mut entry = archive.by_name(&entry_name)?;
        let mut content = String::new();
        entry.read_to_string(&mut content)?;
        properties.extend(parse_properties(&content));
    }
    Ok(properties)
}

/// Minimal `.properties` parsing: `key=value` lines, `#`/`!` comments.
fn parse_properties(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('!'))
        .filter_map(|line| {
            line.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        })
        .collect()
}
