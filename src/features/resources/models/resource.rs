use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::features::cloud_accounts::models::CloudProvider;

/// Kind of discovered resource. EC2/RDS come from AWS, VM/Database from Azure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum ResourceType {
    #[serde(rename = "EC2")]
    Ec2,
    #[serde(rename = "RDS")]
    Rds,
    #[serde(rename = "VM")]
    Vm,
    #[serde(rename = "Database")]
    Database,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Ec2 => "EC2",
            ResourceType::Rds => "RDS",
            ResourceType::Vm => "VM",
            ResourceType::Database => "Database",
        }
    }

    /// Provider whose API reports this kind of resource
    pub fn provider(&self) -> CloudProvider {
        match self {
            ResourceType::Ec2 | ResourceType::Rds => CloudProvider::Aws,
            ResourceType::Vm | ResourceType::Database => CloudProvider::Azure,
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "EC2" => Ok(ResourceType::Ec2),
            "RDS" => Ok(ResourceType::Rds),
            "VM" => Ok(ResourceType::Vm),
            "DATABASE" => Ok(ResourceType::Database),
            _ => Err(format!("Unknown resource type: {}", s)),
        }
    }
}

/// A discovered compute or database instance, scoped to one cloud account.
/// Rows are immutable; rescanning an account appends new rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub id: i32,
    pub resource_id: String,
    pub name: String,
    pub resource_type: ResourceType,
    pub region: String,
    pub state: String,
    pub cloud_account_id: i32,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new resource
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub resource_id: String,
    pub name: String,
    pub resource_type: ResourceType,
    pub region: String,
    pub state: String,
    pub cloud_account_id: i32,
    pub metadata: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_parse_is_case_insensitive() {
        assert_eq!("ec2".parse::<ResourceType>().unwrap(), ResourceType::Ec2);
        assert_eq!("DATABASE".parse::<ResourceType>().unwrap(), ResourceType::Database);
        assert_eq!("database".parse::<ResourceType>().unwrap(), ResourceType::Database);
        assert!("S3".parse::<ResourceType>().is_err());
    }

    #[test]
    fn test_resource_type_wire_names() {
        assert_eq!(serde_json::to_value(ResourceType::Ec2).unwrap(), "EC2");
        assert_eq!(serde_json::to_value(ResourceType::Database).unwrap(), "Database");
        assert_eq!(ResourceType::Vm.to_string(), "VM");
    }
}
