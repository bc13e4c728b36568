use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppPath;
use crate::features::resources::dtos::{ResourceQueryParams, ResourceResponseDto};
use crate::features::resources::services::ResourceService;
use crate::shared::types::ErrorResponse;

/// List resources discovered for a cloud account
#[utoipa::path(
    get,
    path = "/api/resources/{account_id}",
    params(
        ("account_id" = i32, Path, description = "Cloud account ID"),
        ResourceQueryParams
    ),
    responses(
        (status = 200, description = "Resources of the account", body = Vec<ResourceResponseDto>),
        (status = 400, description = "Unknown resource type", body = ErrorResponse)
    ),
    tag = "resources"
)]
pub async fn list_resources(
    State(service): State<Arc<ResourceService>>,
    AppPath(account_id): AppPath<i32>,
    Query(params): Query<ResourceQueryParams>,
) -> Result<Json<Vec<ResourceResponseDto>>> {
    let resources = service
        .list_by_account(account_id, params.resource_type.as_deref())
        .await?;
    Ok(Json(resources.into_iter().map(Into::into).collect()))
}
