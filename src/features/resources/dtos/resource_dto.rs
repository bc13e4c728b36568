use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::{IntoParams, ToSchema};

use crate::features::resources::models::{Resource, ResourceType};

/// Response DTO for a discovered resource
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceResponseDto {
    pub id: i32,
    /// Provider-native identifier (instance id, DB identifier, ARM id)
    #[schema(example = "i-0abc123def456")]
    pub resource_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
    #[schema(example = "us-east-1")]
    pub region: String,
    #[schema(example = "running")]
    pub state: String,
    pub cloud_account_id: i32,
    #[schema(value_type = Object)]
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl From<Resource> for ResourceResponseDto {
    fn from(r: Resource) -> Self {
        Self {
            id: r.id,
            resource_id: r.resource_id,
            name: r.name,
            resource_type: r.resource_type,
            region: r.region,
            state: r.state,
            cloud_account_id: r.cloud_account_id,
            metadata: r.metadata,
            created_at: r.created_at,
        }
    }
}

/// Query parameters for listing resources
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResourceQueryParams {
    /// Only return resources of this type (EC2, RDS, VM, Database; any case)
    #[serde(rename = "type")]
    #[param(rename = "type")]
    pub resource_type: Option<String>,
}
