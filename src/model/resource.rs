//! Resource types extracted from an archive
//!
//! A resource is one classified unit of an archive: a plain file, a
//! declarative bean definition, a classpath element or a public-API-marked
//! class. Ids are archive-relative paths with a leading `/`, except
//! public-API classes which use the dotted qualified class name.

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Discriminant for [`Resource`] variants, also used as the key of the
/// per-type resource multisets in an inventory report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceType {
    Bean,
    ClasspathElement,
    File,
    PublicApiClass,
}

/// One classified unit extracted from an archive.
///
/// Two resources are equal iff variant, `id` and `defining_object` all
/// match. The descriptive payload fields (`bean_class`, `deprecated`) do not
/// participate in equality, hashing or ordering. Resources are deliberately
/// NOT deduplicated by id alone: the same class shipped in two bundled
/// libraries is two resources, and that multiplicity is significant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Resource {
    Bean {
        id: String,
        defining_object: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bean_class: Option<String>,
    },
    ClasspathElement {
        id: String,
        defining_object: String,
    },
    File {
        id: String,
        defining_object: String,
    },
    PublicApiClass {
        id: String,
        defining_object: String,
        deprecated: bool,
    },
}

impl Resource {
    pub fn bean(
        id: impl Into<String>,
        defining_object: impl Into<String>,
        bean_class: Option<String>,
    ) -> Self {
        Resource::Bean {
            id: id.into(),
            defining_object: defining_object.into(),
            bean_class,
        }
    }

    pub fn classpath_element(id: impl Into<String>, defining_object: impl Into<String>) -> Self {
        Resource::ClasspathElement {
            id: id.into(),
            defining_object: defining_object.into(),
        }
    }

    pub fn file(id: impl Into<String>, defining_object: impl Into<String>) -> Self {
        Resource::File {
            id: id.into(),
            defining_object: defining_object.into(),
        }
    }

    pub fn public_api_class(
        id: impl Into<String>,
        defining_object: impl Into<String>,
        deprecated: bool,
    ) -> Self {
        Resource::PublicApiClass {
            id: id.into(),
            defining_object: defining_object.into(),
            deprecated,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        match self {
            Resource::Bean { .. } => ResourceType::Bean,
            Resource::ClasspathElement { .. } => ResourceType::ClasspathElement,
            Resource::File { .. } => ResourceType::File,
            Resource::PublicApiClass { .. } => ResourceType::PublicApiClass,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Resource::Bean { id, .. }
            | Resource::ClasspathElement { id, .. }
            | Resource::File { id, .. }
            | Resource::PublicApiClass { id, .. } => id,
        }
    }

    pub fn defining_object(&self) -> &str {
        match self {
            Resource::Bean {
                defining_object, ..
            }
            | Resource::ClasspathElement {
                defining_object, ..
            }
            | Resource::File {
                defining_object, ..
            }
            | Resource::PublicApiClass {
                defining_object, ..
            } => defining_object,
        }
    }

    /// The declared class of a bean definition, if any. `None` for all other
    /// variants.
    pub fn bean_class(&self) -> Option<&str> {
        match self {
            Resource::Bean { bean_class, .. } => bean_class.as_deref(),
            _ => None,
        }
    }

    fn key(&self) -> (ResourceType, &str, &str) {
        (self.resource_type(), self.id(), self.defining_object())
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Resource {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Resource {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}
