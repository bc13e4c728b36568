use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use futures::stream::{self, Stream};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::discovery::dtos::parse_credentials;
use crate::features::reports::dtos::CreateReportDto;
use crate::features::reports::models::{
    GenerationParams, NewReport, Report, ReportJob, ReportMetadata, ReportOutcome, ReportStatus,
    ReportType,
};
use crate::features::reports::workers::{GenerationError, ReportJobObserver, ReportQueue};
use crate::modules::storage::Storage;

const DOWNLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// An opened report PDF, read lazily while the response is sent
#[derive(Debug)]
pub struct ReportFile {
    pub file_name: String,
    pub file: File,
}

impl ReportFile {
    fn chunks(self) -> impl Stream<Item = std::io::Result<Vec<u8>>> + Send + 'static {
        stream::try_unfold(self.file, |mut file| async move {
            let mut chunk = vec![0u8; DOWNLOAD_CHUNK_SIZE];
            let read = file.read(&mut chunk).await?;
            if read == 0 {
                return Ok::<_, std::io::Error>(None);
            }
            chunk.truncate(read);
            Ok(Some((chunk, file)))
        })
    }

    pub fn into_body(self) -> Body {
        Body::from_stream(self.chunks())
    }
}

/// Billing reports cover one month; utilization reports sample at a frequency
fn check_schedule(dto: &CreateReportDto) -> Result<()> {
    match dto.report_type {
        ReportType::Utilization => {
            if dto.frequency.is_none() {
                return Err(AppError::Validation(
                    "Utilization reports require a frequency (daily or weekly)".to_string(),
                ));
            }
        }
        ReportType::Billing => {
            if dto.frequency.is_some() {
                return Err(AppError::Validation(
                    "Billing reports do not take a frequency".to_string(),
                ));
            }
            if dto.metadata.month.is_none() || dto.metadata.year.is_none() {
                return Err(AppError::Validation(
                    "Billing reports require metadata.month and metadata.year".to_string(),
                ));
            }
        }
    }
    Ok(())
}

pub struct ReportService {
    storage: Arc<dyn Storage>,
    queue: ReportQueue,
}

impl ReportService {
    pub fn new(storage: Arc<dyn Storage>, queue: ReportQueue) -> Self {
        Self { storage, queue }
    }

    /// Record a pending report and queue its generation.
    ///
    /// The queue slot is claimed before the report is stored, so a stored
    /// report always has a job behind it. Credentials travel with the job
    /// only; the stored report never holds them.
    pub async fn create(&self, dto: CreateReportDto) -> Result<Report> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        check_schedule(&dto)?;

        let CreateReportDto {
            cloud_account_id,
            report_type,
            frequency,
            resources,
            metadata,
        } = dto;
        let provider = metadata.provider;

        if let Some(foreign) = resources.iter().find(|r| r.resource_type.provider() != provider) {
            return Err(AppError::Validation(format!(
                "Resource {} does not belong to {}",
                foreign, provider
            )));
        }

        let credentials = parse_credentials(provider, metadata.credentials)?;

        let account = self
            .storage
            .get_cloud_account(cloud_account_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!("Cloud account {} not found", cloud_account_id))
            })?;
        if account.provider != provider {
            return Err(AppError::Validation(format!(
                "Cloud account {} is an {} account, not {}",
                account.id, account.provider, provider
            )));
        }

        // Month and year only describe billing periods
        let (month, year) = match report_type {
            ReportType::Billing => (metadata.month, metadata.year),
            ReportType::Utilization => (None, None),
        };

        let slot = self.queue.reserve()?;

        let report = self
            .storage
            .create_report(NewReport {
                cloud_account_id,
                report_type,
                frequency,
                resources,
                metadata: ReportMetadata {
                    provider,
                    month,
                    year,
                },
            })
            .await?;

        let job = ReportJob {
            report_id: report.id,
            params: GenerationParams {
                cloud_provider: provider,
                report_type,
                credentials,
                resources: report.resources.clone(),
                account_name: account.name.clone(),
                frequency,
                month,
                year,
            },
        };

        slot.submit(job);

        tracing::info!(
            "Report {} ({}) queued for account {} with {} resources",
            report.id,
            report_type.as_str(),
            account.id,
            report.resources.len()
        );
        Ok(report)
    }

    pub async fn list_by_account(&self, cloud_account_id: i32) -> Result<Vec<Report>> {
        self.storage.list_reports(cloud_account_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Report> {
        self.storage
            .get_report(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))
    }

    /// Load the PDF of a completed report
    pub async fn download(&self, id: i32) -> Result<ReportFile> {
        let report = self.get_by_id(id).await?;
        if report.status != ReportStatus::Completed {
            return Err(AppError::BadRequest(format!(
                "Report {} is {}, not completed",
                id, report.status
            )));
        }

        let path = report
            .file_path
            .ok_or_else(|| AppError::Internal(format!("Completed report {} has no file", id)))?;

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("Report {} file {} is gone", id, path.display());
                return Err(AppError::NotFound(format!("Report {} file not found", id)));
            }
            Err(e) => {
                return Err(AppError::Internal(format!(
                    "Failed to open report {} file: {}",
                    id, e
                )))
            }
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("report_{}.pdf", id));

        Ok(ReportFile { file_name, file })
    }

    async fn record_outcome(&self, report_id: i32, outcome: ReportOutcome) {
        let status = outcome.status();
        if let Err(e) = self.storage.transition_report(report_id, outcome).await {
            tracing::error!(
                "Failed to mark report {} as {}: {}",
                report_id,
                status,
                e
            );
        }
    }
}

#[async_trait]
impl ReportJobObserver for ReportService {
    async fn on_completed(&self, report_id: i32, file_path: PathBuf) {
        self.record_outcome(report_id, ReportOutcome::Completed { file_path })
            .await;
    }

    async fn on_failed(&self, report_id: i32, error: &GenerationError) {
        tracing::warn!("Report {} marked failed: {}", report_id, error);
        self.record_outcome(report_id, ReportOutcome::Failed).await;
    }
}
