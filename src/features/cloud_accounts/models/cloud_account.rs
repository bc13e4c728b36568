use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported cloud providers, serialized as `AWS` / `AZURE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CloudProvider {
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "AZURE")]
    Azure,
}

impl CloudProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudProvider::Aws => "AWS",
            CloudProvider::Azure => "AZURE",
        }
    }
}

impl fmt::Display for CloudProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CloudProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AWS" => Ok(CloudProvider::Aws),
            "AZURE" => Ok(CloudProvider::Azure),
            other => Err(format!("Unknown cloud provider: {}", other)),
        }
    }
}

/// A named credential scope for one provider. `(name, provider)` is the natural key.
#[derive(Debug, Clone, PartialEq)]
pub struct CloudAccount {
    pub id: i32,
    pub name: String,
    pub provider: CloudProvider,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new cloud account
#[derive(Debug, Clone)]
pub struct NewCloudAccount {
    pub name: String,
    pub provider: CloudProvider,
}
