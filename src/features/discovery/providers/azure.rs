use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use super::{ProviderClient, ProviderError};
use crate::core::config::AzureConfig;
use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::discovery::models::{AzureCredentials, DiscoveredResource};
use crate::features::resources::models::ResourceType;

const SUBSCRIPTIONS_API_VERSION: &str = "2022-12-01";
const COMPUTE_API_VERSION: &str = "2024-07-01";
const SQL_API_VERSION: &str = "2021-11-01";

const POWER_STATE_PREFIX: &str = "PowerState/";
const SQL_SYSTEM_DATABASE: &str = "master";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Generic ARM list envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArmPage<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
    next_link: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArmLocation {
    name: String,
    #[serde(default)]
    metadata: Option<ArmLocationMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ArmLocationMetadata {
    region_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ArmVirtualMachine {
    id: String,
    name: String,
    location: String,
    #[serde(default)]
    properties: VmProperties,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VmProperties {
    vm_id: Option<String>,
    hardware_profile: Option<HardwareProfile>,
    storage_profile: Option<StorageProfile>,
    instance_view: Option<InstanceView>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HardwareProfile {
    vm_size: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StorageProfile {
    os_disk: Option<OsDisk>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OsDisk {
    os_type: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct InstanceView {
    #[serde(default)]
    statuses: Vec<InstanceStatus>,
}

#[derive(Debug, Clone, Deserialize)]
struct InstanceStatus {
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ArmSqlServer {
    id: String,
    name: String,
    location: String,
}

#[derive(Debug, Deserialize)]
struct ArmSqlDatabase {
    id: String,
    name: String,
    location: String,
    sku: Option<ArmSku>,
    #[serde(default)]
    properties: SqlDatabaseProperties,
}

#[derive(Debug, Deserialize)]
struct ArmSku {
    name: Option<String>,
    tier: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SqlDatabaseProperties {
    status: Option<String>,
    max_size_bytes: Option<i64>,
}

/// ARM location names are compared without case or spaces
/// ("East US" and "eastus" are the same location)
fn same_location(a: &str, b: &str) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    normalize(a) == normalize(b)
}

fn power_state(view: Option<&InstanceView>) -> Option<String> {
    view?
        .statuses
        .iter()
        .filter_map(|status| status.code.as_deref())
        .find_map(|code| code.strip_prefix(POWER_STATE_PREFIX))
        .map(str::to_string)
}

fn vm_to_resource(vm: &ArmVirtualMachine, region: &str) -> DiscoveredResource {
    let props = &vm.properties;
    let mut metadata = Map::new();
    if let Some(size) = props.hardware_profile.as_ref().and_then(|h| h.vm_size.clone()) {
        metadata.insert("vmSize".to_string(), Value::String(size));
    }
    if let Some(os_type) = props
        .storage_profile
        .as_ref()
        .and_then(|s| s.os_disk.as_ref())
        .and_then(|d| d.os_type.clone())
    {
        metadata.insert("osType".to_string(), Value::String(os_type));
    }
    if let Some(vm_id) = props.vm_id.clone() {
        metadata.insert("vmId".to_string(), Value::String(vm_id));
    }

    DiscoveredResource {
        resource_id: vm.id.clone(),
        name: Some(vm.name.clone()),
        resource_type: ResourceType::Vm,
        region: region.to_string(),
        state: power_state(props.instance_view.as_ref()),
        metadata,
    }
}

fn database_to_resource(
    db: &ArmSqlDatabase,
    server: &ArmSqlServer,
    region: &str,
) -> DiscoveredResource {
    let mut metadata = Map::new();
    metadata.insert("server".to_string(), Value::String(server.name.clone()));
    if let Some(sku) = &db.sku {
        if let Some(tier) = sku.tier.clone() {
            metadata.insert("edition".to_string(), Value::String(tier));
        }
        if let Some(name) = sku.name.clone() {
            metadata.insert("serviceObjective".to_string(), Value::String(name));
        }
    }
    if let Some(max_size) = db.properties.max_size_bytes {
        metadata.insert("maxSizeBytes".to_string(), Value::from(max_size));
    }

    DiscoveredResource {
        resource_id: db.id.clone(),
        name: Some(db.name.clone()),
        resource_type: ResourceType::Database,
        region: region.to_string(),
        state: db.properties.status.clone(),
        metadata,
    }
}

/// Azure Resource Manager session for one service principal and subscription
pub struct AzureProvider {
    http: reqwest::Client,
    config: AzureConfig,
    credentials: AzureCredentials,
    token: OnceCell<String>,
    /// The VM listing is subscription-wide, so it is fetched once per scan
    /// and filtered per location.
    virtual_machines: OnceCell<Vec<ArmVirtualMachine>>,
    sql_servers: OnceCell<Vec<ArmSqlServer>>,
}

impl AzureProvider {
    pub fn new(http: reqwest::Client, config: AzureConfig, credentials: AzureCredentials) -> Self {
        Self {
            http,
            config,
            credentials,
            token: OnceCell::new(),
            virtual_machines: OnceCell::new(),
            sql_servers: OnceCell::new(),
        }
    }

    fn subscription_url(&self, path: &str, api_version: &str) -> String {
        format!(
            "{}/subscriptions/{}{}?api-version={}",
            self.config.management_endpoint, self.credentials.subscription_id, path, api_version
        )
    }

    async fn access_token(&self) -> Result<&str, ProviderError> {
        let token = self
            .token
            .get_or_try_init(|| self.fetch_token())
            .await?;
        Ok(token.as_str())
    }

    /// Client-credentials grant against the tenant's token endpoint
    async fn fetch_token(&self) -> Result<String, ProviderError> {
        let url = format!(
            "{}/{}/oauth2/v2.0/token",
            self.config.login_endpoint, self.credentials.tenant_id
        );
        let scope = format!("{}/.default", self.config.management_endpoint);

        tracing::debug!("Requesting Azure access token from {}", url);

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
                ("scope", scope.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Authentication {
                provider: CloudProvider::Azure,
                message: format!("token request failed: HTTP {} - {}", status, body),
            });
        }

        let bytes = response.bytes().await?;
        let token: TokenResponse = serde_json::from_slice(&bytes)?;
        Ok(token.access_token)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ProviderError> {
        let token = self.access_token().await?;
        let response = self.http.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                provider: CloudProvider::Azure,
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Follow `nextLink` until the listing is exhausted
    async fn get_all<T: DeserializeOwned>(&self, url: String) -> Result<Vec<T>, ProviderError> {
        let mut items = Vec::new();
        let mut next = Some(url);
        while let Some(url) = next {
            let page: ArmPage<T> = self.get_json(&url).await?;
            items.extend(page.value);
            next = page.next_link;
        }
        Ok(items)
    }

    async fn virtual_machines(&self) -> Result<&[ArmVirtualMachine], ProviderError> {
        let vms = self
            .virtual_machines
            .get_or_try_init(|| async {
                let url = format!(
                    "{}&statusOnly=true",
                    self.subscription_url(
                        "/providers/Microsoft.Compute/virtualMachines",
                        COMPUTE_API_VERSION
                    )
                );
                let vms: Vec<ArmVirtualMachine> = self.get_all(url).await?;
                tracing::debug!("Azure subscription lists {} virtual machines", vms.len());
                Ok::<_, ProviderError>(vms)
            })
            .await?;
        Ok(vms.as_slice())
    }

    /// Subscription-wide like the VM listing; databases are then listed per server
    async fn sql_servers(&self) -> Result<&[ArmSqlServer], ProviderError> {
        let servers = self
            .sql_servers
            .get_or_try_init(|| async {
                let servers: Vec<ArmSqlServer> = self
                    .get_all(
                        self.subscription_url("/providers/Microsoft.Sql/servers", SQL_API_VERSION),
                    )
                    .await?;
                tracing::debug!("Azure subscription lists {} SQL servers", servers.len());
                Ok::<_, ProviderError>(servers)
            })
            .await?;
        Ok(servers.as_slice())
    }
}

#[async_trait]
impl ProviderClient for AzureProvider {
    fn kind(&self) -> CloudProvider {
        CloudProvider::Azure
    }

    async fn list_regions(&self) -> Result<Vec<String>, ProviderError> {
        let locations: Vec<ArmLocation> = self
            .get_all(self.subscription_url("/locations", SUBSCRIPTIONS_API_VERSION))
            .await?;

        // Logical locations (e.g. geography groupings) cannot host resources
        Ok(locations
            .into_iter()
            .filter(|loc| {
                loc.metadata
                    .as_ref()
                    .and_then(|m| m.region_type.as_deref())
                    .is_none_or(|t| !t.eq_ignore_ascii_case("logical"))
            })
            .map(|loc| loc.name)
            .collect())
    }

    async fn list_compute(&self, region: &str) -> Result<Vec<DiscoveredResource>, ProviderError> {
        Ok(self
            .virtual_machines()
            .await?
            .iter()
            .filter(|vm| same_location(&vm.location, region))
            .map(|vm| vm_to_resource(vm, region))
            .collect())
    }

    async fn list_databases(
        &self,
        region: &str,
    ) -> Result<Vec<DiscoveredResource>, ProviderError> {
        let mut resources = Vec::new();
        for server in self
            .sql_servers()
            .await?
            .iter()
            .filter(|s| same_location(&s.location, region))
        {
            let url = format!(
                "{}{}/databases?api-version={}",
                self.config.management_endpoint, server.id, SQL_API_VERSION
            );
            let databases: Vec<ArmSqlDatabase> = self.get_all(url).await?;
            resources.extend(
                databases
                    .iter()
                    .filter(|db| !db.name.eq_ignore_ascii_case(SQL_SYSTEM_DATABASE))
                    .filter(|db| same_location(&db.location, region))
                    .map(|db| database_to_resource(db, server, region)),
            );
        }

        Ok(resources)
    }
}
