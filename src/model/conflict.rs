//! Conflict types produced by the checker set

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use super::Resource;

/// The conflict families the checker set can detect.
///
/// Variants are declared alphabetically; the derived ordering is the
/// lexicographic kind ordering the report grouping relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ConflictKind {
    BeanOverwrite,
    BeanRestrictedClass,
    ClasspathElement,
    CustomCodeUsage,
    FileOverwrite,
    ThirdPartyLibraryUsage,
}

impl ConflictKind {
    /// Human-readable header printed above this kind's report section.
    pub fn header(self) -> &'static str {
        match self {
            ConflictKind::BeanOverwrite => {
                "Found bean definitions that would overwrite beans shipped with the platform."
            }
            ConflictKind::BeanRestrictedClass => {
                "Found bean definitions instantiating internal platform classes. \
                 Internal classes may change or disappear between releases without notice."
            }
            ConflictKind::ClasspathElement => {
                "Found classpath elements that collide with elements already present \
                 in the target release."
            }
            ConflictKind::CustomCodeUsage => {
                "Found usage of internal platform classes. Classes outside the published \
                 public API are implementation details and may change or disappear \
                 between releases without notice."
            }
            ConflictKind::FileOverwrite => {
                "Found files that would overwrite files shipped with the target release."
            }
            ConflictKind::ThirdPartyLibraryUsage => {
                "Found usage of libraries bundled with the target release. Bundled \
                 third-party libraries are implementation details and may change or \
                 disappear between releases without notice."
            }
        }
    }
}

/// One detected incompatibility between an extension resource and a target
/// release.
///
/// Equality, hashing and ordering are defined over `(kind,
/// extension_resource, target_resource, target_version)`. The matched
/// dependency set is payload, not identity: the same logical conflict must
/// collapse when independently produced during aggregation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conflict {
    pub kind: ConflictKind,
    pub extension_resource: Resource,
    /// The matching target resource. Absent for dependency-style conflicts
    /// and for the extension-only restricted-class check.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_resource: Option<Resource>,
    /// Matched dependency ids, only populated for the two usage kinds.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub dependencies: BTreeSet<String>,
    pub target_version: String,
}

impl Conflict {
    /// A conflict pairing an extension resource with a target resource.
    pub fn paired(
        kind: ConflictKind,
        extension_resource: Resource,
        target_resource: Resource,
        target_version: impl Into<String>,
    ) -> Self {
        Conflict {
            kind,
            extension_resource,
            target_resource: Some(target_resource),
            dependencies: BTreeSet::new(),
            target_version: target_version.into(),
        }
    }

    /// A conflict triggered by the extension resource alone.
    pub fn extension_only(
        kind: ConflictKind,
        extension_resource: Resource,
        target_version: impl Into<String>,
    ) -> Self {
        Conflict {
            kind,
            extension_resource,
            target_resource: None,
            dependencies: BTreeSet::new(),
            target_version: target_version.into(),
        }
    }

    /// A dependency-usage conflict carrying the matched id set.
    pub fn usage(
        kind: ConflictKind,
        extension_resource: Resource,
        dependencies: BTreeSet<String>,
        target_version: impl Into<String>,
    ) -> Self {
        Conflict {
            kind,
            extension_resource,
            target_resource: None,
            dependencies,
            target_version: target_version.into(),
        }
    }

    fn key(&self) -> (ConflictKind, &Resource, &Option<Resource>, &str) {
        (
            self.kind,
            &self.extension_resource,
            &self.target_resource,
            &self.target_version,
        )
    }
}

impl PartialEq for Conflict {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Conflict {}

impl Hash for Conflict {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Conflict {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Conflict {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
