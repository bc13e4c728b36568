use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::cloud_accounts::models::{CloudAccount, CloudProvider};

/// Request DTO for creating a cloud account
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCloudAccountDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    #[schema(example = "Production")]
    pub name: String,
    pub provider: CloudProvider,
}

/// Response DTO for a cloud account
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CloudAccountResponseDto {
    pub id: i32,
    pub name: String,
    pub provider: CloudProvider,
    pub created_at: DateTime<Utc>,
}

impl From<CloudAccount> for CloudAccountResponseDto {
    fn from(a: CloudAccount) -> Self {
        Self {
            id: a.id,
            name: a.name,
            provider: a.provider,
            created_at: a.created_at,
        }
    }
}
