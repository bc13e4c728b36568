use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::reports::models::ResourceSelector;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Utilization,
    Billing,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Utilization => "utilization",
            ReportType::Billing => "billing",
        }
    }
}

impl FromStr for ReportType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "utilization" => Ok(ReportType::Utilization),
            "billing" => Ok(ReportType::Billing),
            other => Err(format!("Unknown report type: {}", other)),
        }
    }
}

/// Sampling window of a utilization report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFrequency {
    Daily,
    Weekly,
}

impl ReportFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFrequency::Daily => "daily",
            ReportFrequency::Weekly => "weekly",
        }
    }
}

impl FromStr for ReportFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(ReportFrequency::Daily),
            "weekly" => Ok(ReportFrequency::Weekly),
            other => Err(format!("Unknown report frequency: {}", other)),
        }
    }
}

/// Report lifecycle. `Completed` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Completed,
    Failed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::Completed => "completed",
            ReportStatus::Failed => "failed",
        }
    }

    /// Only `pending -> completed` and `pending -> failed` are allowed
    pub fn can_transition_to(&self, next: ReportStatus) -> bool {
        matches!(
            (self, next),
            (ReportStatus::Pending, ReportStatus::Completed)
                | (ReportStatus::Pending, ReportStatus::Failed)
        )
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReportStatus::Pending),
            "completed" => Ok(ReportStatus::Completed),
            "failed" => Ok(ReportStatus::Failed),
            other => Err(format!("Unknown report status: {}", other)),
        }
    }
}

/// Persisted report details. Credentials are never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub provider: CloudProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub id: i32,
    pub cloud_account_id: i32,
    pub report_type: ReportType,
    pub frequency: Option<ReportFrequency>,
    /// Public download location, set only on completion
    pub report_url: Option<String>,
    /// Where the generator wrote the PDF, set only on completion
    pub file_path: Option<PathBuf>,
    pub resources: Vec<ResourceSelector>,
    pub status: ReportStatus,
    pub metadata: ReportMetadata,
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new report; always starts `pending`
#[derive(Debug, Clone)]
pub struct NewReport {
    pub cloud_account_id: i32,
    pub report_type: ReportType,
    pub frequency: Option<ReportFrequency>,
    pub resources: Vec<ResourceSelector>,
    pub metadata: ReportMetadata,
}

/// Terminal result recorded for a pending report
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Completed { file_path: PathBuf },
    Failed,
}

impl ReportOutcome {
    pub fn status(&self) -> ReportStatus {
        match self {
            ReportOutcome::Completed { .. } => ReportStatus::Completed,
            ReportOutcome::Failed => ReportStatus::Failed,
        }
    }
}

/// Download location exposed for a completed report
pub fn download_url(report_id: i32) -> String {
    format!("/api/reports/{}/download", report_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_transitions_are_one_way() {
        use ReportStatus::*;

        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Failed));
        assert!(!Pending.can_transition_to(Pending));

        for terminal in [Completed, Failed] {
            for next in [Pending, Completed, Failed] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_metadata_omits_absent_period() {
        let metadata = ReportMetadata {
            provider: CloudProvider::Aws,
            month: None,
            year: None,
        };
        assert_eq!(
            serde_json::to_value(&metadata).unwrap(),
            serde_json::json!({"provider": "AWS"})
        );
    }
}
