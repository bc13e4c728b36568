use std::sync::Arc;

use validator::Validate;

use crate::core::config::ScanConfig;
use crate::core::error::{AppError, Result};
use crate::features::cloud_accounts::models::CloudAccount;
use crate::features::discovery::dtos::{AwsValidateDto, AzureValidateDto};
use crate::features::discovery::models::{ProviderCredentials, ScanFailure};
use crate::features::discovery::providers::ProviderConnector;
use crate::features::discovery::services::ResourceScanner;
use crate::features::resources::models::Resource;
use crate::modules::storage::Storage;

/// Everything a successful credential check produced
#[derive(Debug)]
pub struct DiscoveryResult {
    pub account: CloudAccount,
    pub resources: Vec<Resource>,
    pub failures: Vec<ScanFailure>,
}

/// Credential check, region fan-out and persistence of the findings
pub struct DiscoveryService {
    storage: Arc<dyn Storage>,
    connector: Arc<dyn ProviderConnector>,
    scanner: ResourceScanner,
}

impl DiscoveryService {
    pub fn new(
        storage: Arc<dyn Storage>,
        connector: Arc<dyn ProviderConnector>,
        scan: ScanConfig,
    ) -> Self {
        Self {
            storage,
            connector,
            scanner: ResourceScanner::new(scan),
        }
    }

    pub async fn validate_aws(&self, dto: AwsValidateDto) -> Result<DiscoveryResult> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let account_name = dto.account_name();
        self.discover(account_name, ProviderCredentials::Aws(dto.into_credentials()))
            .await
    }

    pub async fn validate_azure(&self, dto: AzureValidateDto) -> Result<DiscoveryResult> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let account_name = dto.account_name();
        self.discover(
            account_name,
            ProviderCredentials::Azure(dto.into_credentials()),
        )
        .await
    }

    async fn discover(
        &self,
        account_name: String,
        credentials: ProviderCredentials,
    ) -> Result<DiscoveryResult> {
        let provider_kind = credentials.provider();
        let provider = self.connector.connect(&credentials).await?;

        // Region listing doubles as the credential check
        let regions = self.scanner.enumerate_regions(provider.as_ref()).await?;
        let outcome = self.scanner.scan(provider, regions).await?;

        // Only verified credentials get an account
        let account = self
            .storage
            .get_or_create_cloud_account(&account_name, provider_kind)
            .await?;

        let new_resources = outcome
            .resources
            .into_iter()
            .map(|r| r.into_new_resource(account.id))
            .collect();
        let resources = self.storage.create_resources(new_resources).await?;

        tracing::info!(
            "{} account {} ({}) validated: {} resources stored, {} listings failed",
            provider_kind,
            account.id,
            account.name,
            resources.len(),
            outcome.failures.len()
        );

        Ok(DiscoveryResult {
            account,
            resources,
            failures: outcome.failures,
        })
    }
}
