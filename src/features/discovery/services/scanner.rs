use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};

use crate::core::config::{ScanConfig, ScanFailurePolicy};
use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::discovery::models::{
    DiscoveredResource, ScanFailure, ScanKind, ScannedResource,
};
use crate::features::discovery::providers::{ProviderClient, ProviderError};
use crate::shared::constants::{
    AWS_FALLBACK_REGIONS, AZURE_FALLBACK_REGIONS, TERMINATED_STATE, UNKNOWN_STATE,
};

/// Result of scanning every region of one provider session
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Region order first, then compute before databases
    pub resources: Vec<ScannedResource>,
    /// Listings absorbed under [`ScanFailurePolicy::BestEffort`]
    pub failures: Vec<ScanFailure>,
}

fn fallback_regions(provider: CloudProvider) -> Vec<String> {
    let regions: &[&str] = match provider {
        CloudProvider::Aws => &AWS_FALLBACK_REGIONS,
        CloudProvider::Azure => &AZURE_FALLBACK_REGIONS,
    };
    regions.iter().map(|r| r.to_string()).collect()
}

/// Drops terminated resources, fills in a missing name with the resource id
/// and lower-cases the state.
pub fn normalize(resource: DiscoveredResource) -> Option<ScannedResource> {
    let state = resource
        .state
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| UNKNOWN_STATE.to_string());

    if state == TERMINATED_STATE {
        return None;
    }

    let name = resource
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| resource.resource_id.clone());

    Some(ScannedResource {
        resource_id: resource.resource_id,
        name,
        resource_type: resource.resource_type,
        region: resource.region,
        state,
        metadata: resource.metadata,
    })
}

/// Walks a provider's regions with bounded concurrency
pub struct ResourceScanner {
    config: ScanConfig,
}

impl ResourceScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    async fn call<T, F>(&self, operation: String, call: F) -> Result<T, ProviderError>
    where
        F: Future<Output = Result<T, ProviderError>>,
    {
        let limit: Duration = self.config.call_timeout;
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| ProviderError::Timeout {
                operation,
                seconds: limit.as_secs(),
            })?
    }

    /// Regions to scan. Any failure here is authoritative: the credentials
    /// are treated as unusable.
    pub async fn enumerate_regions(
        &self,
        provider: &dyn ProviderClient,
    ) -> Result<Vec<String>, ProviderError> {
        let kind = provider.kind();
        let regions = self
            .call(format!("{} region listing", kind), provider.list_regions())
            .await?;

        if regions.is_empty() {
            tracing::warn!(
                "{} returned no regions, falling back to the static region list",
                kind
            );
            return Ok(fallback_regions(kind));
        }

        Ok(regions)
    }

    pub async fn scan(
        &self,
        provider: Arc<dyn ProviderClient>,
        regions: Vec<String>,
    ) -> Result<ScanOutcome, ProviderError> {
        tracing::info!(
            "Scanning {} {} regions (concurrency {})",
            regions.len(),
            provider.kind(),
            self.config.concurrency
        );

        let per_region: Vec<ScanOutcome> = stream::iter(regions)
            .map(|region| {
                let provider = Arc::clone(&provider);
                async move { self.scan_region(provider.as_ref(), &region).await }
            })
            .buffered(self.config.concurrency)
            .try_collect()
            .await?;

        let mut outcome = ScanOutcome::default();
        for region in per_region {
            outcome.resources.extend(region.resources);
            outcome.failures.extend(region.failures);
        }

        tracing::info!(
            "Scan finished: {} resources, {} failed listings",
            outcome.resources.len(),
            outcome.failures.len()
        );
        Ok(outcome)
    }

    async fn scan_region(
        &self,
        provider: &dyn ProviderClient,
        region: &str,
    ) -> Result<ScanOutcome, ProviderError> {
        let mut outcome = ScanOutcome::default();

        for kind in [ScanKind::Compute, ScanKind::Database] {
            let operation = format!("{} {} listing in {}", provider.kind(), kind.as_str(), region);
            let listed = match kind {
                ScanKind::Compute => self.call(operation, provider.list_compute(region)).await,
                ScanKind::Database => self.call(operation, provider.list_databases(region)).await,
            };

            match listed {
                Ok(resources) => outcome
                    .resources
                    .extend(resources.into_iter().filter_map(normalize)),
                Err(e) if self.config.failure_policy == ScanFailurePolicy::FailFast => {
                    tracing::error!("Aborting scan: {} listing in {} failed: {}", kind.as_str(), region, e);
                    return Err(e);
                }
                Err(e) => {
                    tracing::warn!("Skipping {} listing in {}: {}", kind.as_str(), region, e);
                    outcome.failures.push(ScanFailure {
                        region: region.to_string(),
                        kind,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::features::resources::models::ResourceType;
    use crate::shared::test_helpers::{discovered, FakeProvider};

    fn scanner(policy: ScanFailurePolicy) -> ResourceScanner {
        ResourceScanner::new(ScanConfig {
            concurrency: 4,
            call_timeout: Duration::from_millis(200),
            failure_policy: policy,
            ..ScanConfig::default()
        })
    }

    #[test]
    fn test_normalize_rules() {
        let unnamed = discovered(ResourceType::Ec2, "i-1", "us-east-1", Some("RUNNING"));
        let scanned = normalize(unnamed).unwrap();
        assert_eq!(scanned.name, "i-1");
        assert_eq!(scanned.state, "running");

        let stateless = discovered(ResourceType::Rds, "db-1", "us-east-1", None);
        assert_eq!(normalize(stateless).unwrap().state, "unknown");

        let gone = discovered(ResourceType::Ec2, "i-2", "us-east-1", Some("Terminated"));
        assert!(normalize(gone).is_none());

        let mut named = discovered(ResourceType::Vm, "vm-1", "eastus", Some("running"));
        named.name = Some("web".to_string());
        assert_eq!(normalize(named).unwrap().name, "web");
    }

    #[tokio::test]
    async fn test_empty_region_list_falls_back_to_static_list() {
        let aws = FakeProvider::new(CloudProvider::Aws).with_regions(&[]);
        let regions = scanner(ScanFailurePolicy::BestEffort)
            .enumerate_regions(&aws)
            .await
            .unwrap();
        assert_eq!(regions.len(), 17);
        assert_eq!(regions[0], "us-east-1");

        let azure = FakeProvider::new(CloudProvider::Azure).with_regions(&[]);
        let regions = scanner(ScanFailurePolicy::BestEffort)
            .enumerate_regions(&azure)
            .await
            .unwrap();
        assert_eq!(regions.len(), 19);
    }

    #[tokio::test]
    async fn test_region_listing_failure_is_authoritative() {
        let provider = FakeProvider::new(CloudProvider::Aws).rejecting("AuthFailure");
        let err = scanner(ScanFailurePolicy::BestEffort)
            .enumerate_regions(&provider)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("AuthFailure"));
    }

    #[tokio::test]
    async fn test_best_effort_isolates_failed_listing() {
        let provider = FakeProvider::new(CloudProvider::Aws)
            .with_regions(&["us-east-1", "eu-west-1"])
            .failing_compute("us-east-1", "UnauthorizedOperation")
            .with_databases(
                "us-east-1",
                vec![discovered(ResourceType::Rds, "db-1", "us-east-1", Some("available"))],
            )
            .with_compute(
                "eu-west-1",
                vec![discovered(ResourceType::Ec2, "i-1", "eu-west-1", Some("running"))],
            );

        let outcome = scanner(ScanFailurePolicy::BestEffort)
            .scan(Arc::new(provider), vec!["us-east-1".into(), "eu-west-1".into()])
            .await
            .unwrap();

        let ids: Vec<_> = outcome.resources.iter().map(|r| r.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["db-1", "i-1"]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].region, "us-east-1");
        assert_eq!(outcome.failures[0].kind, ScanKind::Compute);
        assert!(outcome.failures[0].error.contains("UnauthorizedOperation"));
    }

    #[tokio::test]
    async fn test_fail_fast_aborts_scan() {
        let provider = FakeProvider::new(CloudProvider::Aws)
            .with_regions(&["us-east-1"])
            .failing_compute("us-east-1", "UnauthorizedOperation");

        let result = scanner(ScanFailurePolicy::FailFast)
            .scan(Arc::new(provider), vec!["us-east-1".into()])
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_output_keeps_region_order_despite_concurrency() {
        // The first region answers last
        let provider = FakeProvider::new(CloudProvider::Aws)
            .with_compute(
                "us-east-1",
                vec![discovered(ResourceType::Ec2, "i-slow", "us-east-1", Some("running"))],
            )
            .with_delay("us-east-1", Duration::from_millis(80))
            .with_compute(
                "us-west-2",
                vec![discovered(ResourceType::Ec2, "i-fast", "us-west-2", Some("running"))],
            );

        let outcome = scanner(ScanFailurePolicy::BestEffort)
            .scan(Arc::new(provider), vec!["us-east-1".into(), "us-west-2".into()])
            .await
            .unwrap();

        let ids: Vec<_> = outcome.resources.iter().map(|r| r.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["i-slow", "i-fast"]);
    }

    #[tokio::test]
    async fn test_slow_listing_times_out_as_failure() {
        let provider = FakeProvider::new(CloudProvider::Azure)
            .with_delay("eastus", Duration::from_secs(5));

        let outcome = scanner(ScanFailurePolicy::BestEffort)
            .scan(Arc::new(provider), vec!["eastus".into()])
            .await
            .unwrap();

        assert!(outcome.resources.is_empty());
        assert_eq!(outcome.failures.len(), 2);
        assert!(outcome.failures[0].error.contains("timed out"));
    }

    #[tokio::test]
    async fn test_terminated_resources_are_not_returned() {
        let provider = FakeProvider::new(CloudProvider::Aws).with_compute(
            "us-east-1",
            vec![
                discovered(ResourceType::Ec2, "i-live", "us-east-1", Some("stopped")),
                discovered(ResourceType::Ec2, "i-dead", "us-east-1", Some("terminated")),
            ],
        );

        let outcome = scanner(ScanFailurePolicy::BestEffort)
            .scan(Arc::new(provider), vec!["us-east-1".into()])
            .await
            .unwrap();

        assert_eq!(outcome.resources.len(), 1);
        assert_eq!(outcome.resources[0].state, "stopped");
    }
}
