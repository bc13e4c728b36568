use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::cloud_accounts::handlers;
use crate::features::cloud_accounts::services::CloudAccountService;

pub fn routes(cloud_account_service: Arc<CloudAccountService>) -> Router {
    Router::new()
        .route(
            "/api/cloud-accounts",
            get(handlers::list_cloud_accounts).post(handlers::create_cloud_account),
        )
        .with_state(cloud_account_service)
}
