use tokio::sync::mpsc::{self, error::TrySendError};

use crate::core::error::{AppError, Result};
use crate::features::reports::models::ReportJob;

/// Producer side of the report job queue
#[derive(Clone)]
pub struct ReportQueue {
    sender: mpsc::Sender<ReportJob>,
}

/// A reserved place in the queue. Dropping it without submitting frees the place.
pub struct QueueSlot<'a> {
    permit: mpsc::Permit<'a, ReportJob>,
}

impl ReportQueue {
    /// Create a bounded queue; the receiver belongs to the dispatcher
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<ReportJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender }, receiver)
    }

    /// Claim room for one job without waiting.
    ///
    /// A full queue is `ServiceUnavailable`; a closed one (dispatcher gone) is `Internal`.
    pub fn reserve(&self) -> Result<QueueSlot<'_>> {
        match self.sender.try_reserve() {
            Ok(permit) => Ok(QueueSlot { permit }),
            Err(TrySendError::Full(())) => {
                tracing::warn!("Report queue is full, rejecting new report");
                Err(AppError::ServiceUnavailable(
                    "Report queue is full, try again later".to_string(),
                ))
            }
            Err(TrySendError::Closed(())) => Err(AppError::Internal(
                "Report queue is closed, dispatcher is not running".to_string(),
            )),
        }
    }
}

impl QueueSlot<'_> {
    /// Hand the job to the dispatcher
    pub fn submit(self, job: ReportJob) {
        let report_id = job.report_id;
        self.permit.send(job);
        tracing::debug!("Report {} queued for generation", report_id);
    }
}
