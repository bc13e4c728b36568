use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::reports::models::{
    Report, ReportFrequency, ReportMetadata, ReportStatus, ReportType, ResourceSelector,
};

/// Request DTO for creating a report.
///
/// Unknown fields (the wizard also sends `status`) are ignored.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReportDto {
    pub cloud_account_id: i32,

    #[serde(rename = "type")]
    pub report_type: ReportType,

    /// Required for utilization reports, rejected for billing reports
    pub frequency: Option<ReportFrequency>,

    /// Selected resources as `TYPE|ID|REGION`
    #[validate(length(min = 1, message = "At least one resource must be selected"))]
    #[schema(value_type = Vec<String>, example = json!(["EC2|i-123|us-east-1"]))]
    pub resources: Vec<ResourceSelector>,

    #[validate(nested)]
    pub metadata: CreateReportMetadataDto,
}

/// Provider, credentials and billing period of a report request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateReportMetadataDto {
    pub provider: CloudProvider,

    /// Same shape as the matching validate request body
    #[schema(value_type = Object)]
    pub credentials: serde_json::Value,

    #[validate(range(min = 1, max = 12, message = "Month must be between 1 and 12"))]
    pub month: Option<u32>,

    #[validate(range(min = 2000, max = 2100, message = "Year must be between 2000 and 2100"))]
    pub year: Option<i32>,
}

/// Stored report metadata; credentials are never returned
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportMetadataDto {
    pub provider: CloudProvider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl From<ReportMetadata> for ReportMetadataDto {
    fn from(m: ReportMetadata) -> Self {
        Self {
            provider: m.provider,
            month: m.month,
            year: m.year,
        }
    }
}

/// Response DTO for a report
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportResponseDto {
    pub id: i32,
    pub cloud_account_id: i32,
    #[serde(rename = "type")]
    pub report_type: ReportType,
    pub frequency: Option<ReportFrequency>,
    /// Set once the report is completed
    pub report_url: Option<String>,
    #[schema(value_type = Vec<String>, example = json!(["EC2|i-123|us-east-1"]))]
    pub resources: Vec<ResourceSelector>,
    pub status: ReportStatus,
    pub metadata: ReportMetadataDto,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportResponseDto {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            cloud_account_id: r.cloud_account_id,
            report_type: r.report_type,
            frequency: r.frequency,
            report_url: r.report_url,
            resources: r.resources,
            status: r.status,
            metadata: r.metadata.into(),
            created_at: r.created_at,
        }
    }
}

/// Response DTO for status polling
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportStatusResponseDto {
    pub status: ReportStatus,
    pub report_url: Option<String>,
}

impl From<Report> for ReportStatusResponseDto {
    fn from(r: Report) -> Self {
        Self {
            status: r.status,
            report_url: r.report_url,
        }
    }
}
