use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_credential_types::Credentials;
use aws_sdk_ec2::error::DisplayErrorContext;
use aws_sdk_ec2::types::Instance;
use aws_sdk_rds::types::DbInstance;
use serde_json::{Map, Value};

use super::{ProviderClient, ProviderError};
use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::discovery::models::{AwsCredentials, DiscoveredResource};
use crate::features::resources::models::ResourceType;

/// AWS session built from static access keys
pub struct AwsProvider {
    sdk_config: SdkConfig,
}

impl AwsProvider {
    /// Load an SDK config pinned to `anchor_region`. No API call is made
    /// here; the first `list_regions` call is what proves the keys work.
    pub async fn connect(credentials: &AwsCredentials, anchor_region: &str) -> Self {
        let static_creds = Credentials::new(
            &credentials.access_key_id,
            &credentials.secret_access_key,
            None,
            None,
            "cloudreport_static",
        );

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .credentials_provider(SharedCredentialsProvider::new(static_creds))
            .region(Region::new(anchor_region.to_string()))
            .load()
            .await;

        Self { sdk_config }
    }

    fn ec2_client(&self, region: &str) -> aws_sdk_ec2::Client {
        let conf = aws_sdk_ec2::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_ec2::Client::from_conf(conf)
    }

    fn rds_client(&self, region: &str) -> aws_sdk_rds::Client {
        let conf = aws_sdk_rds::config::Builder::from(&self.sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_rds::Client::from_conf(conf)
    }
}

fn api_error<E: std::error::Error + 'static>(err: E) -> ProviderError {
    ProviderError::Api {
        provider: CloudProvider::Aws,
        message: DisplayErrorContext(&err).to_string(),
    }
}

fn insert_str(metadata: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        metadata.insert(key.to_string(), Value::String(value.to_string()));
    }
}

fn instance_to_resource(instance: &Instance, region: &str) -> Option<DiscoveredResource> {
    let resource_id = instance.instance_id()?.to_string();

    let name = instance
        .tags()
        .iter()
        .find(|tag| tag.key() == Some("Name"))
        .and_then(|tag| tag.value())
        .map(str::to_string);

    let state = instance
        .state()
        .and_then(|state| state.name())
        .map(|name| name.as_str().to_string());

    let mut metadata = Map::new();
    insert_str(
        &mut metadata,
        "instanceType",
        instance.instance_type().map(|t| t.as_str()),
    );
    metadata.insert(
        "platform".to_string(),
        Value::String(
            instance
                .platform()
                .map(|p| p.as_str())
                .unwrap_or("linux")
                .to_string(),
        ),
    );
    insert_str(&mut metadata, "privateIp", instance.private_ip_address());
    insert_str(&mut metadata, "publicIp", instance.public_ip_address());

    Some(DiscoveredResource {
        resource_id,
        name,
        resource_type: ResourceType::Ec2,
        region: region.to_string(),
        state,
        metadata,
    })
}

fn db_instance_to_resource(db: &DbInstance, region: &str) -> Option<DiscoveredResource> {
    let resource_id = db.db_instance_identifier()?.to_string();
    let name = db
        .db_name()
        .map(str::to_string)
        .or_else(|| Some(resource_id.clone()));

    let mut metadata = Map::new();
    insert_str(&mut metadata, "instanceClass", db.db_instance_class());
    insert_str(&mut metadata, "engine", db.engine());
    insert_str(&mut metadata, "engineVersion", db.engine_version());
    if let Some(storage) = db.allocated_storage() {
        metadata.insert("storage".to_string(), Value::from(storage));
    }

    Some(DiscoveredResource {
        resource_id,
        name,
        resource_type: ResourceType::Rds,
        region: region.to_string(),
        state: db.db_instance_status().map(str::to_string),
        metadata,
    })
}

#[async_trait]
impl ProviderClient for AwsProvider {
    fn kind(&self) -> CloudProvider {
        CloudProvider::Aws
    }

    async fn list_regions(&self) -> Result<Vec<String>, ProviderError> {
        let output = aws_sdk_ec2::Client::new(&self.sdk_config)
            .describe_regions()
            .send()
            .await
            .map_err(api_error)?;

        Ok(output
            .regions()
            .iter()
            .filter_map(|r| r.region_name())
            .map(str::to_string)
            .collect())
    }

    async fn list_compute(&self, region: &str) -> Result<Vec<DiscoveredResource>, ProviderError> {
        let mut pages = self
            .ec2_client(region)
            .describe_instances()
            .into_paginator()
            .send();

        let mut resources = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(api_error)?;
            for reservation in page.reservations() {
                resources.extend(
                    reservation
                        .instances()
                        .iter()
                        .filter_map(|instance| instance_to_resource(instance, region)),
                );
            }
        }

        tracing::debug!("Found {} EC2 instances in {}", resources.len(), region);
        Ok(resources)
    }

    async fn list_databases(
        &self,
        region: &str,
    ) -> Result<Vec<DiscoveredResource>, ProviderError> {
        let mut pages = self
            .rds_client(region)
            .describe_db_instances()
            .into_paginator()
            .send();

        let mut resources = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(api_error)?;
            resources.extend(
                page.db_instances()
                    .iter()
                    .filter_map(|db| db_instance_to_resource(db, region)),
            );
        }

        tracing::debug!("Found {} RDS instances in {}", resources.len(), region);
        Ok(resources)
    }
}
