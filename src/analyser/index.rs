//! Derived views over an extension inventory
//!
//! Checkers share one index per analysis run; each view is computed on
//! first use and memoized, so running against fifty target versions costs
//! the same index work as running against one.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::analyser::config::AnalyserConfig;
use crate::model::{InventoryReport, Resource, ResourceType};

/// Classpath entries that cannot collide at load time.
const NON_CODE_EXTENSIONS: &[&str] = &[".txt", ".md"];

/// Memoized resource views over one extension inventory.
pub struct ResourceIndex<'a> {
    extension: &'a InventoryReport,
    config: &'a AnalyserConfig,
    bean_overrides: OnceLock<BTreeMap<&'a str, Vec<&'a Resource>>>,
    classpath_elements: OnceLock<BTreeMap<&'a str, Vec<&'a Resource>>>,
    files_by_destination: OnceLock<BTreeMap<String, Vec<&'a Resource>>>,
    restricted_beans: OnceLock<Vec<&'a Resource>>,
}

impl<'a> ResourceIndex<'a> {
    pub fn new(extension: &'a InventoryReport, config: &'a AnalyserConfig) -> Self {
        Self {
            extension,
            config,
            bean_overrides: OnceLock::new(),
            classpath_elements: OnceLock::new(),
            files_by_destination: OnceLock::new(),
            restricted_beans: OnceLock::new(),
        }
    }

    /// Extension beans that may override a target bean, grouped by id.
    /// Allow-listed ids are excluded.
    pub fn bean_overrides_by_id(&self) -> &BTreeMap<&'a str, Vec<&'a Resource>> {
        self.bean_overrides.get_or_init(|| {
            let mut by_id: BTreeMap<&str, Vec<&Resource>> = BTreeMap::new();
            for bean in self.extension.resources_of(ResourceType::Bean) {
                if self.config.bean_override_allowlist.contains(bean.id()) {
                    continue;
                }
                by_id.entry(bean.id()).or_default().push(bean);
            }
            by_id
        })
    }

    /// Extension classpath elements grouped by id, with non-code entries
    /// (plain text, markdown) dropped.
    pub fn classpath_elements_by_id(&self) -> &BTreeMap<&'a str, Vec<&'a Resource>> {
        self.classpath_elements.get_or_init(|| {
            let mut by_id: BTreeMap<&str, Vec<&Resource>> = BTreeMap::new();
            for element in self.extension.resources_of(ResourceType::ClasspathElement) {
                if is_non_code(element.id()) {
                    continue;
                }
                by_id.entry(element.id()).or_default().push(element);
            }
            by_id
        })
    }

    /// Extension file resources grouped by their install destination after
    /// applying the configured path mappings.
    pub fn files_by_destination(&self) -> &BTreeMap<String, Vec<&'a Resource>> {
        self.files_by_destination.get_or_init(|| {
            let mut by_destination: BTreeMap<String, Vec<&Resource>> = BTreeMap::new();
            for file in self.extension.resources_of(ResourceType::File) {
                let destination = resolve_destination(&self.config.file_mappings, file.id());
                by_destination.entry(destination).or_default().push(file);
            }
            by_destination
        })
    }

    /// Extension beans instantiating a class inside the platform's internal
    /// namespace, minus the allow-listed classes.
    pub fn restricted_beans(&self) -> &[&'a Resource] {
        self.restricted_beans.get_or_init(|| {
            let prefix = format!("{}.", self.config.internal_package_prefix);
            self.extension
                .resources_of(ResourceType::Bean)
                .iter()
                .filter(|bean| {
                    bean.bean_class().is_some_and(|class| {
                        class.starts_with(&prefix)
                            && !self.config.restricted_class_allowlist.contains(class)
                    })
                })
                .collect()
        })
    }
}

fn is_non_code(id: &str) -> bool {
    let lowered = id.to_ascii_lowercase();
    NON_CODE_EXTENSIONS.iter().any(|ext| lowered.ends_with(ext))
}

/// Resolve a file's install destination through the mapping table.
///
/// The most specific (longest) mapping whose source is a path-prefix of the
/// id wins; its first occurrence in the id is replaced by the destination.
/// Unmapped files install at their id unchanged.
pub fn resolve_destination(mappings: &BTreeMap<String, String>, id: &str) -> String {
    let best = mappings
        .iter()
        .filter(|(source, _)| id.starts_with(&format!("{source}/")))
        .max_by_key(|(source, _)| source.len());

    let Some((source, destination)) = best else {
        return id.to_string();
    };

    let mapped = id.replacen(source.as_str(), destination, 1);
    if let Some(rest) = mapped.strip_prefix("//") {
        format!("/{rest}")
    } else {
        mapped
    }
}
