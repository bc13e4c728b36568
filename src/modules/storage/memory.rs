//! Volatile in-memory backend. Contents live as long as the process.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use super::{duplicate_account_error, Storage};
use crate::core::error::{AppError, Result};
use crate::features::cloud_accounts::models::{CloudAccount, CloudProvider, NewCloudAccount};
use crate::features::reports::models::{
    download_url, NewReport, Report, ReportOutcome, ReportStatus,
};
use crate::features::resources::models::{NewResource, Resource, ResourceType};

/// Id counters and tables share one lock so id assignment and
/// lookup-or-create cannot interleave.
#[derive(Default)]
struct MemoryState {
    cloud_accounts: BTreeMap<i32, CloudAccount>,
    resources: BTreeMap<i32, Resource>,
    reports: BTreeMap<i32, Report>,
    last_cloud_account_id: i32,
    last_resource_id: i32,
    last_report_id: i32,
}

impl MemoryState {
    fn find_account(&self, name: &str, provider: CloudProvider) -> Option<&CloudAccount> {
        self.cloud_accounts
            .values()
            .find(|account| account.name == name && account.provider == provider)
    }

    fn insert_account(&mut self, name: String, provider: CloudProvider) -> CloudAccount {
        self.last_cloud_account_id += 1;
        let account = CloudAccount {
            id: self.last_cloud_account_id,
            name,
            provider,
            created_at: Utc::now(),
        };
        self.cloud_accounts.insert(account.id, account.clone());
        account
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn create_cloud_account(&self, account: NewCloudAccount) -> Result<CloudAccount> {
        let mut state = self.state.lock().await;
        if state.find_account(&account.name, account.provider).is_some() {
            return Err(duplicate_account_error(&account.name, account.provider));
        }
        Ok(state.insert_account(account.name, account.provider))
    }

    async fn get_cloud_account(&self, id: i32) -> Result<Option<CloudAccount>> {
        Ok(self.state.lock().await.cloud_accounts.get(&id).cloned())
    }

    async fn get_or_create_cloud_account(
        &self,
        name: &str,
        provider: CloudProvider,
    ) -> Result<CloudAccount> {
        let mut state = self.state.lock().await;
        if let Some(existing) = state.find_account(name, provider) {
            return Ok(existing.clone());
        }
        Ok(state.insert_account(name.to_string(), provider))
    }

    async fn list_cloud_accounts(&self) -> Result<Vec<CloudAccount>> {
        Ok(self
            .state
            .lock()
            .await
            .cloud_accounts
            .values()
            .cloned()
            .collect())
    }

    async fn create_resources(&self, resources: Vec<NewResource>) -> Result<Vec<Resource>> {
        let mut state = self.state.lock().await;
        let now = Utc::now();
        let mut created = Vec::with_capacity(resources.len());

        for new in resources {
            state.last_resource_id += 1;
            let resource = Resource {
                id: state.last_resource_id,
                resource_id: new.resource_id,
                name: new.name,
                resource_type: new.resource_type,
                region: new.region,
                state: new.state,
                cloud_account_id: new.cloud_account_id,
                metadata: new.metadata,
                created_at: now,
            };
            state.resources.insert(resource.id, resource.clone());
            created.push(resource);
        }

        Ok(created)
    }

    async fn list_resources(
        &self,
        cloud_account_id: i32,
        resource_type: Option<ResourceType>,
    ) -> Result<Vec<Resource>> {
        Ok(self
            .state
            .lock()
            .await
            .resources
            .values()
            .filter(|r| r.cloud_account_id == cloud_account_id)
            .filter(|r| resource_type.is_none_or(|t| r.resource_type == t))
            .cloned()
            .collect())
    }

    async fn create_report(&self, report: NewReport) -> Result<Report> {
        let mut state = self.state.lock().await;
        state.last_report_id += 1;
        let report = Report {
            id: state.last_report_id,
            cloud_account_id: report.cloud_account_id,
            report_type: report.report_type,
            frequency: report.frequency,
            report_url: None,
            file_path: None,
            resources: report.resources,
            status: ReportStatus::Pending,
            metadata: report.metadata,
            created_at: Utc::now(),
        };
        state.reports.insert(report.id, report.clone());
        Ok(report)
    }

    async fn get_report(&self, id: i32) -> Result<Option<Report>> {
        Ok(self.state.lock().await.reports.get(&id).cloned())
    }

    async fn list_reports(&self, cloud_account_id: i32) -> Result<Vec<Report>> {
        Ok(self
            .state
            .lock()
            .await
            .reports
            .values()
            .filter(|r| r.cloud_account_id == cloud_account_id)
            .cloned()
            .collect())
    }

    async fn transition_report(&self, id: i32, outcome: ReportOutcome) -> Result<Report> {
        let mut state = self.state.lock().await;
        let report = state
            .reports
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        let next = outcome.status();
        if !report.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Report {} is already {} and cannot become {}",
                id, report.status, next
            )));
        }

        report.status = next;
        if let ReportOutcome::Completed { file_path } = outcome {
            report.report_url = Some(download_url(id));
            report.file_path = Some(file_path);
        }

        Ok(report.clone())
    }
}
