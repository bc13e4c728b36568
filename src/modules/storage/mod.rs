//! Storage module for accounts, resources and reports
//!
//! Handlers and services only see the [`Storage`] trait. Two backends exist:
//! a volatile in-memory store (default, and what tests use) and a Postgres
//! store selected when `DATABASE_URL` is configured.

mod memory;
mod postgres;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::cloud_accounts::models::{CloudAccount, CloudProvider, NewCloudAccount};
use crate::features::reports::models::{NewReport, Report, ReportOutcome};
use crate::features::resources::models::{NewResource, Resource, ResourceType};

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

#[async_trait]
pub trait Storage: Send + Sync {
    // Cloud accounts

    /// Create an account. Fails with `Validation` if `(name, provider)` already exists.
    async fn create_cloud_account(&self, account: NewCloudAccount) -> Result<CloudAccount>;
    async fn get_cloud_account(&self, id: i32) -> Result<Option<CloudAccount>>;
    /// Atomic lookup-or-create on the `(name, provider)` natural key
    async fn get_or_create_cloud_account(
        &self,
        name: &str,
        provider: CloudProvider,
    ) -> Result<CloudAccount>;
    async fn list_cloud_accounts(&self) -> Result<Vec<CloudAccount>>;

    // Resources

    async fn create_resources(&self, resources: Vec<NewResource>) -> Result<Vec<Resource>>;
    async fn list_resources(
        &self,
        cloud_account_id: i32,
        resource_type: Option<ResourceType>,
    ) -> Result<Vec<Resource>>;

    // Reports

    async fn create_report(&self, report: NewReport) -> Result<Report>;
    async fn get_report(&self, id: i32) -> Result<Option<Report>>;
    async fn list_reports(&self, cloud_account_id: i32) -> Result<Vec<Report>>;
    /// Move a pending report to its terminal state.
    /// `NotFound` for unknown ids, `Conflict` if the report is no longer pending.
    async fn transition_report(&self, id: i32, outcome: ReportOutcome) -> Result<Report>;
}

fn duplicate_account_error(name: &str, provider: CloudProvider) -> AppError {
    AppError::Validation(format!(
        "Cloud account '{}' for {} already exists",
        name, provider
    ))
}
