use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::cloud_accounts::dtos::{CloudAccountResponseDto, CreateCloudAccountDto};
use crate::features::cloud_accounts::services::CloudAccountService;
use crate::shared::types::ErrorResponse;

/// List all cloud accounts
#[utoipa::path(
    get,
    path = "/api/cloud-accounts",
    responses(
        (status = 200, description = "All cloud accounts", body = Vec<CloudAccountResponseDto>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "cloud-accounts"
)]
pub async fn list_cloud_accounts(
    State(service): State<Arc<CloudAccountService>>,
) -> Result<Json<Vec<CloudAccountResponseDto>>> {
    let accounts = service.list().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// Create a cloud account
#[utoipa::path(
    post,
    path = "/api/cloud-accounts",
    request_body = CreateCloudAccountDto,
    responses(
        (status = 201, description = "Account created", body = CloudAccountResponseDto),
        (status = 400, description = "Invalid body or duplicate (name, provider)", body = ErrorResponse)
    ),
    tag = "cloud-accounts"
)]
pub async fn create_cloud_account(
    State(service): State<Arc<CloudAccountService>>,
    AppJson(dto): AppJson<CreateCloudAccountDto>,
) -> Result<(StatusCode, Json<CloudAccountResponseDto>)> {
    let account = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}
