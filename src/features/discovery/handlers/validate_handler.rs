use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::discovery::dtos::{AwsValidateDto, AzureValidateDto, ValidateResponseDto};
use crate::features::discovery::services::{DiscoveryResult, DiscoveryService};
use crate::shared::types::ErrorResponse;

fn into_response(result: DiscoveryResult) -> ValidateResponseDto {
    ValidateResponseDto {
        valid: true,
        account_id: result.account.id,
        resources: result.resources.into_iter().map(Into::into).collect(),
        failed_scans: result.failures.into_iter().map(Into::into).collect(),
    }
}

/// Validate AWS access keys and scan every region for EC2 and RDS instances
#[utoipa::path(
    post,
    path = "/api/aws/validate",
    request_body = AwsValidateDto,
    responses(
        (status = 200, description = "Credentials valid, resources discovered", body = ValidateResponseDto),
        (status = 400, description = "Malformed or rejected credentials", body = ErrorResponse),
        (status = 504, description = "AWS did not answer in time", body = ErrorResponse)
    ),
    tag = "discovery"
)]
pub async fn validate_aws(
    State(service): State<Arc<DiscoveryService>>,
    AppJson(dto): AppJson<AwsValidateDto>,
) -> Result<Json<ValidateResponseDto>> {
    let result = service.validate_aws(dto).await?;
    Ok(Json(into_response(result)))
}

/// Validate an Azure service principal and scan every location for VMs and SQL databases
#[utoipa::path(
    post,
    path = "/api/azure/validate",
    request_body = AzureValidateDto,
    responses(
        (status = 200, description = "Credentials valid, resources discovered", body = ValidateResponseDto),
        (status = 400, description = "Malformed or rejected credentials", body = ErrorResponse),
        (status = 504, description = "Azure did not answer in time", body = ErrorResponse)
    ),
    tag = "discovery"
)]
pub async fn validate_azure(
    State(service): State<Arc<DiscoveryService>>,
    AppJson(dto): AppJson<AzureValidateDto>,
) -> Result<Json<ValidateResponseDto>> {
    let result = service.validate_azure(dto).await?;
    Ok(Json(into_response(result)))
}
