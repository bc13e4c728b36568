use std::sync::Arc;

use axum::{routing::post, Router};

use crate::features::discovery::handlers;
use crate::features::discovery::services::DiscoveryService;

pub fn routes(discovery_service: Arc<DiscoveryService>) -> Router {
    Router::new()
        .route("/api/aws/validate", post(handlers::validate_aws))
        .route("/api/azure/validate", post(handlers::validate_azure))
        .with_state(discovery_service)
}
