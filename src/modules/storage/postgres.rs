//! Durable Postgres backend. Schema lives in `migrations/`.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::{duplicate_account_error, Storage};
use crate::core::error::{AppError, Result};
use crate::features::cloud_accounts::models::{CloudAccount, CloudProvider, NewCloudAccount};
use crate::features::reports::models::{
    download_url, NewReport, Report, ReportMetadata, ReportOutcome, ReportStatus,
    ResourceSelector,
};
use crate::features::resources::models::{NewResource, Resource, ResourceType};

/// Bind parameters per statement are capped by Postgres at 65535
const RESOURCE_INSERT_CHUNK: usize = 1000;

const CLOUD_ACCOUNT_COLUMNS: &str = "id, name, provider, created_at";
const RESOURCE_COLUMNS: &str =
    "id, resource_id, name, resource_type, region, state, cloud_account_id, metadata, created_at";
const REPORT_COLUMNS: &str = "id, cloud_account_id, report_type, frequency, report_url, file_path, \
     resources, status, metadata, created_at";

#[derive(Debug, FromRow)]
struct CloudAccountRow {
    id: i32,
    name: String,
    provider: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<CloudAccountRow> for CloudAccount {
    type Error = AppError;

    fn try_from(row: CloudAccountRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            name: row.name,
            provider: row.provider.parse().map_err(AppError::Internal)?,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ResourceRow {
    id: i32,
    resource_id: String,
    name: String,
    resource_type: String,
    region: String,
    state: String,
    cloud_account_id: i32,
    metadata: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ResourceRow> for Resource {
    type Error = AppError;

    fn try_from(row: ResourceRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            resource_id: row.resource_id,
            name: row.name,
            resource_type: row.resource_type.parse().map_err(AppError::Internal)?,
            region: row.region,
            state: row.state,
            cloud_account_id: row.cloud_account_id,
            metadata: row.metadata.0,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReportRow {
    id: i32,
    cloud_account_id: i32,
    report_type: String,
    frequency: Option<String>,
    report_url: Option<String>,
    file_path: Option<String>,
    resources: Json<Vec<ResourceSelector>>,
    status: String,
    metadata: Json<ReportMetadata>,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = AppError;

    fn try_from(row: ReportRow) -> Result<Self> {
        Ok(Self {
            id: row.id,
            cloud_account_id: row.cloud_account_id,
            report_type: row.report_type.parse().map_err(AppError::Internal)?,
            frequency: row
                .frequency
                .map(|f| f.parse())
                .transpose()
                .map_err(AppError::Internal)?,
            report_url: row.report_url,
            file_path: row.file_path.map(PathBuf::from),
            resources: row.resources.0,
            status: row.status.parse().map_err(AppError::Internal)?,
            metadata: row.metadata.0,
            created_at: row.created_at,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}

pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Storage for PgStorage {
    async fn create_cloud_account(&self, account: NewCloudAccount) -> Result<CloudAccount> {
        let row = sqlx::query_as::<_, CloudAccountRow>(&format!(
            "INSERT INTO cloud_accounts (name, provider) VALUES ($1, $2) RETURNING {}",
            CLOUD_ACCOUNT_COLUMNS
        ))
        .bind(&account.name)
        .bind(account.provider.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let duplicate = e
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation());
            if duplicate {
                duplicate_account_error(&account.name, account.provider)
            } else {
                tracing::error!("Failed to insert cloud account: {:?}", e);
                AppError::Database(e)
            }
        })?;

        tracing::info!(
            "Cloud account created: id={}, provider={}",
            row.id,
            row.provider
        );
        row.try_into()
    }

    async fn get_cloud_account(&self, id: i32) -> Result<Option<CloudAccount>> {
        sqlx::query_as::<_, CloudAccountRow>(&format!(
            "SELECT {} FROM cloud_accounts WHERE id = $1",
            CLOUD_ACCOUNT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(CloudAccount::try_from)
        .transpose()
    }

    async fn get_or_create_cloud_account(
        &self,
        name: &str,
        provider: CloudProvider,
    ) -> Result<CloudAccount> {
        // The no-op update makes RETURNING yield the existing row on conflict
        let row = sqlx::query_as::<_, CloudAccountRow>(&format!(
            r#"
            INSERT INTO cloud_accounts (name, provider) VALUES ($1, $2)
            ON CONFLICT (name, provider) DO UPDATE SET name = EXCLUDED.name
            RETURNING {}
            "#,
            CLOUD_ACCOUNT_COLUMNS
        ))
        .bind(name)
        .bind(provider.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert cloud account: {:?}", e);
            AppError::Database(e)
        })?;

        row.try_into()
    }

    async fn list_cloud_accounts(&self) -> Result<Vec<CloudAccount>> {
        let rows = sqlx::query_as::<_, CloudAccountRow>(&format!(
            "SELECT {} FROM cloud_accounts ORDER BY id",
            CLOUD_ACCOUNT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn create_resources(&self, resources: Vec<NewResource>) -> Result<Vec<Resource>> {
        if resources.is_empty() {
            return Ok(Vec::new());
        }

        let mut tx = self.pool.begin().await?;
        let mut rows: Vec<ResourceRow> = Vec::with_capacity(resources.len());

        for chunk in resources.chunks(RESOURCE_INSERT_CHUNK) {
            let mut builder = QueryBuilder::<Postgres>::new(
                "INSERT INTO resources \
                 (resource_id, name, resource_type, region, state, cloud_account_id, metadata) ",
            );
            builder.push_values(chunk, |mut b, resource| {
                b.push_bind(resource.resource_id.clone())
                    .push_bind(resource.name.clone())
                    .push_bind(resource.resource_type.as_str())
                    .push_bind(resource.region.clone())
                    .push_bind(resource.state.clone())
                    .push_bind(resource.cloud_account_id)
                    .push_bind(Json(resource.metadata.clone()));
            });
            builder.push(" RETURNING ");
            builder.push(RESOURCE_COLUMNS);

            let inserted = builder
                .build_query_as::<ResourceRow>()
                .fetch_all(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to insert resources: {:?}", e);
                    AppError::Database(e)
                })?;
            rows.extend(inserted);
        }

        tx.commit().await?;

        rows.sort_by_key(|row| row.id);
        convert_all(rows)
    }

    async fn list_resources(
        &self,
        cloud_account_id: i32,
        resource_type: Option<ResourceType>,
    ) -> Result<Vec<Resource>> {
        let rows = sqlx::query_as::<_, ResourceRow>(&format!(
            r#"
            SELECT {} FROM resources
            WHERE cloud_account_id = $1
            AND ($2::text IS NULL OR resource_type = $2)
            ORDER BY id
            "#,
            RESOURCE_COLUMNS
        ))
        .bind(cloud_account_id)
        .bind(resource_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn create_report(&self, report: NewReport) -> Result<Report> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            INSERT INTO reports (cloud_account_id, report_type, frequency, resources, status, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(report.cloud_account_id)
        .bind(report.report_type.as_str())
        .bind(report.frequency.map(|f| f.as_str()))
        .bind(Json(&report.resources))
        .bind(ReportStatus::Pending.as_str())
        .bind(Json(&report.metadata))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert report: {:?}", e);
            AppError::Database(e)
        })?;

        row.try_into()
    }

    async fn get_report(&self, id: i32) -> Result<Option<Report>> {
        sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {} FROM reports WHERE id = $1",
            REPORT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Report::try_from)
        .transpose()
    }

    async fn list_reports(&self, cloud_account_id: i32) -> Result<Vec<Report>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT {} FROM reports WHERE cloud_account_id = $1 ORDER BY id",
            REPORT_COLUMNS
        ))
        .bind(cloud_account_id)
        .fetch_all(&self.pool)
        .await?;

        convert_all(rows)
    }

    async fn transition_report(&self, id: i32, outcome: ReportOutcome) -> Result<Report> {
        let next = outcome.status();
        let (report_url, file_path) = match &outcome {
            ReportOutcome::Completed { file_path } => (
                Some(download_url(id)),
                Some(file_path.to_string_lossy().into_owned()),
            ),
            ReportOutcome::Failed => (None, None),
        };

        // The status guard makes the transition one-way even under concurrent writers
        let updated = sqlx::query_as::<_, ReportRow>(&format!(
            r#"
            UPDATE reports
            SET status = $2, report_url = $3, file_path = $4
            WHERE id = $1 AND status = 'pending'
            RETURNING {}
            "#,
            REPORT_COLUMNS
        ))
        .bind(id)
        .bind(next.as_str())
        .bind(report_url)
        .bind(file_path)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update report status: {:?}", e);
            AppError::Database(e)
        })?;

        match updated {
            Some(row) => row.try_into(),
            None => match self.get_report(id).await? {
                Some(current) => Err(AppError::Conflict(format!(
                    "Report {} is already {} and cannot become {}",
                    id, current.status, next
                ))),
                None => Err(AppError::NotFound(format!("Report {} not found", id))),
            },
        }
    }
}
