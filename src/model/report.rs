//! Inventory report: the classified resource multiset of one archive

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Resource, ResourceType};

/// The full classified resource set extracted from one archive.
///
/// Immutable once built. Baseline (target release) reports carry a version
/// tag; extension reports do not. Resource lists are multisets: the same
/// resource id can appear multiple times under different defining objects.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub resources: HashMap<ResourceType, Vec<Resource>>,
}

impl InventoryReport {
    pub fn new(version: Option<String>) -> Self {
        InventoryReport {
            version,
            resources: HashMap::new(),
        }
    }

    pub fn add(&mut self, resource: Resource) {
        self.resources
            .entry(resource.resource_type())
            .or_default()
            .push(resource);
    }

    /// All resources of one type; empty slice when the type is absent.
    pub fn resources_of(&self, resource_type: ResourceType) -> &[Resource] {
        self.resources
            .get(&resource_type)
            .map_or(&[], Vec::as_slice)
    }

    pub fn has_resources_of(&self, resource_type: ResourceType) -> bool {
        !self.resources_of(resource_type).is_empty()
    }
}
