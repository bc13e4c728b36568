use serde::Serialize;

use crate::features::cloud_accounts::models::CloudProvider;
use crate::features::discovery::models::ProviderCredentials;
use crate::features::reports::models::{
    ReportFrequency, ReportType, ResourceSelector,
};

/// Parameters handed to the external generator as `params.json`.
/// Field names and shapes are the generator's contract.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub cloud_provider: CloudProvider,
    pub report_type: ReportType,
    pub credentials: ProviderCredentials,
    pub resources: Vec<ResourceSelector>,
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<ReportFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

/// One unit of work on the report queue
#[derive(Debug, Clone)]
pub struct ReportJob {
    pub report_id: i32,
    pub params: GenerationParams,
}
