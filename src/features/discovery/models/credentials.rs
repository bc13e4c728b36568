use std::fmt;

use serde::Serialize;

use crate::features::cloud_accounts::models::CloudProvider;

/// Structurally validated AWS access key pair
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .finish()
    }
}

/// Structurally validated Azure service principal
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub subscription_id: String,
}

impl fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("tenant_id", &self.tenant_id)
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

/// Credentials for either provider. Serializes to the bare credential object,
/// which is what the report generator expects under `credentials`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProviderCredentials {
    Aws(AwsCredentials),
    Azure(AzureCredentials),
}

impl ProviderCredentials {
    pub fn provider(&self) -> CloudProvider {
        match self {
            ProviderCredentials::Aws(_) => CloudProvider::Aws,
            ProviderCredentials::Azure(_) => CloudProvider::Azure,
        }
    }
}
