use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::features::resources::models::ResourceType;
use crate::shared::validation::REGION_CODE_REGEX;

const SEPARATOR: char = '|';

/// A resource picked for a report. Travels typed through the pipeline and is
/// only rendered as `TYPE|ID|REGION` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceSelector {
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub region: String,
}

impl ResourceSelector {
    pub fn new(
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            resource_type,
            resource_id: resource_id.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for ResourceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.resource_type,
            self.resource_id,
            self.region,
            sep = SEPARATOR
        )
    }
}

impl FromStr for ResourceSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(SEPARATOR).collect();
        let [kind, id, region] = parts.as_slice() else {
            return Err(format!(
                "Invalid resource '{}': expected TYPE|ID|REGION",
                s
            ));
        };

        let resource_type = kind
            .trim()
            .parse::<ResourceType>()
            .map_err(|e| format!("Invalid resource '{}': {}", s, e))?;

        let resource_id = id.trim();
        if resource_id.is_empty() {
            return Err(format!("Invalid resource '{}': empty resource id", s));
        }

        let region = region.trim();
        if !REGION_CODE_REGEX.is_match(region) {
            return Err(format!("Invalid resource '{}': bad region '{}'", s, region));
        }

        Ok(Self::new(resource_type, resource_id, region))
    }
}

impl Serialize for ResourceSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
