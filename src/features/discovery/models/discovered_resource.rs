use serde_json::{Map, Value};

use crate::features::resources::models::{NewResource, ResourceType};

/// A resource as reported by a provider API, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveredResource {
    pub resource_id: String,
    /// Preferred display name (e.g. the `Name` tag); falls back to `resource_id`
    pub name: Option<String>,
    pub resource_type: ResourceType,
    pub region: String,
    /// Raw provider status, any casing
    pub state: Option<String>,
    pub metadata: Map<String, Value>,
}

/// A discovered resource after normalization: it always has a name and a
/// lower-case state.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedResource {
    pub resource_id: String,
    pub name: String,
    pub resource_type: ResourceType,
    pub region: String,
    pub state: String,
    pub metadata: Map<String, Value>,
}

impl ScannedResource {
    pub fn into_new_resource(self, cloud_account_id: i32) -> NewResource {
        NewResource {
            resource_id: self.resource_id,
            name: self.name,
            resource_type: self.resource_type,
            region: self.region,
            state: self.state,
            cloud_account_id,
            metadata: self.metadata,
        }
    }
}

/// Which of the two per-region listings a scan call covered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanKind {
    Compute,
    Database,
}

impl ScanKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanKind::Compute => "compute",
            ScanKind::Database => "database",
        }
    }
}

/// A single region/kind listing that failed and was absorbed
#[derive(Debug, Clone, PartialEq)]
pub struct ScanFailure {
    pub region: String,
    pub kind: ScanKind,
    pub error: String,
}
