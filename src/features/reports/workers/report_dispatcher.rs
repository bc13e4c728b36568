use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::timeout;

use super::generator::{GenerationError, ReportGenerator};
use crate::core::config::ReportConfig;
use crate::features::reports::models::ReportJob;

/// Receives the terminal result of every dispatched job
#[async_trait]
pub trait ReportJobObserver: Send + Sync {
    async fn on_completed(&self, report_id: i32, file_path: PathBuf);

    /// `error` is for server-side logging only
    async fn on_failed(&self, report_id: i32, error: &GenerationError);
}

/// Background worker that drains the report queue.
///
/// Each job runs in its own task; a semaphore caps how many run at once.
pub struct ReportDispatcher {
    receiver: mpsc::Receiver<ReportJob>,
    generator: Arc<dyn ReportGenerator>,
    observer: Arc<dyn ReportJobObserver>,
    permits: Arc<Semaphore>,
    job_timeout: Duration,
    max_attempts: u32,
}

impl ReportDispatcher {
    pub fn new(
        receiver: mpsc::Receiver<ReportJob>,
        generator: Arc<dyn ReportGenerator>,
        observer: Arc<dyn ReportJobObserver>,
        config: &ReportConfig,
    ) -> Self {
        Self {
            receiver,
            generator,
            observer,
            permits: Arc::new(Semaphore::new(config.max_concurrent_jobs)),
            job_timeout: config.timeout,
            max_attempts: config.max_attempts.max(1),
        }
    }

    /// Run until every queue sender is dropped
    pub async fn run(mut self) {
        tracing::info!(
            "Starting report dispatcher (max {} concurrent jobs, {}s timeout, {} attempt(s))",
            self.permits.available_permits(),
            self.job_timeout.as_secs(),
            self.max_attempts
        );

        while let Some(job) = self.receiver.recv().await {
            let permit = match Arc::clone(&self.permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::error!("Report dispatcher semaphore closed: {}", e);
                    break;
                }
            };

            let generator = Arc::clone(&self.generator);
            let observer = Arc::clone(&self.observer);
            let job_timeout = self.job_timeout;
            let max_attempts = self.max_attempts;

            tokio::spawn(async move {
                let _permit = permit;
                run_job(job, generator, observer, job_timeout, max_attempts).await;
            });
        }

        tracing::info!("Report queue closed, dispatcher stopping");
    }
}

async fn run_job(
    job: ReportJob,
    generator: Arc<dyn ReportGenerator>,
    observer: Arc<dyn ReportJobObserver>,
    job_timeout: Duration,
    max_attempts: u32,
) {
    let mut attempt = 1;
    loop {
        let result = match timeout(job_timeout, generator.generate(&job)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(job_timeout.as_secs())),
        };

        match result {
            Ok(file_path) => {
                tracing::info!(
                    "Report {} generated on attempt {}: {}",
                    job.report_id,
                    attempt,
                    file_path.display()
                );
                observer.on_completed(job.report_id, file_path).await;
                return;
            }
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    "Report {} attempt {}/{} failed, retrying: {}",
                    job.report_id,
                    attempt,
                    max_attempts,
                    e
                );
                attempt += 1;
            }
            Err(e) => {
                tracing::error!(
                    "Report {} failed after {} attempt(s): {}",
                    job.report_id,
                    attempt,
                    e
                );
                observer.on_failed(job.report_id, &e).await;
                return;
            }
        }
    }
}
