mod aws;
mod azure;

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::config::{AzureConfig, ScanConfig};
use crate::core::error::AppError;
use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::discovery::models::{DiscoveredResource, ProviderCredentials};

pub use aws::AwsProvider;
pub use azure::AzureProvider;

/// Errors raised while talking to a cloud provider API
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The SDK or API returned an error for the call
    #[error("{provider} API error: {message}")]
    Api {
        provider: CloudProvider,
        message: String,
    },

    /// Non-2xx status from a REST endpoint
    #[error("{provider} API HTTP error: status={status}, body={body}")]
    Http {
        provider: CloudProvider,
        status: u16,
        body: String,
    },

    #[error("{provider} authentication failed: {message}")]
    Authentication {
        provider: CloudProvider,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Timeout { .. } => AppError::Timeout(err.to_string()),
            other => AppError::InvalidCredentials(other.to_string()),
        }
    }
}

/// One authenticated session against a cloud provider.
///
/// Implementations return raw discovered resources; normalization and
/// failure policy are applied by the scanner.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn kind(&self) -> CloudProvider;

    /// Regions visible to the credentials. A failure here means the
    /// credentials are unusable.
    async fn list_regions(&self) -> Result<Vec<String>, ProviderError>;

    async fn list_compute(&self, region: &str) -> Result<Vec<DiscoveredResource>, ProviderError>;

    async fn list_databases(&self, region: &str)
        -> Result<Vec<DiscoveredResource>, ProviderError>;
}

/// Builds a [`ProviderClient`] for a set of credentials
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    async fn connect(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn ProviderClient>, ProviderError>;
}

/// Connector backed by the AWS SDK and the Azure Resource Manager REST API
pub struct SdkProviderConnector {
    aws_anchor_region: String,
    azure: AzureConfig,
    http: reqwest::Client,
}

impl SdkProviderConnector {
    pub fn new(scan: &ScanConfig, azure: AzureConfig) -> Self {
        Self {
            aws_anchor_region: scan.aws_anchor_region.clone(),
            azure,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ProviderConnector for SdkProviderConnector {
    async fn connect(
        &self,
        credentials: &ProviderCredentials,
    ) -> Result<Arc<dyn ProviderClient>, ProviderError> {
        match credentials {
            ProviderCredentials::Aws(creds) => {
                let provider = AwsProvider::connect(creds, &self.aws_anchor_region).await;
                Ok(Arc::new(provider))
            }
            ProviderCredentials::Azure(creds) => Ok(Arc::new(AzureProvider::new(
                self.http.clone(),
                self.azure.clone(),
                creds.clone(),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_timeout_maps_to_app_timeout() {
        let err: AppError = ProviderError::Timeout {
            operation: "list regions".to_string(),
            seconds: 30,
        }
        .into();
        assert!(matches!(err, AppError::Timeout(_)));
    }

    #[test]
    fn test_api_error_maps_to_invalid_credentials() {
        let err: AppError = ProviderError::Api {
            provider: CloudProvider::Aws,
            message: "AuthFailure: AWS was not able to validate the provided access credentials"
                .to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
