use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::resources::handlers;
use crate::features::resources::services::ResourceService;

pub fn routes(resource_service: Arc<ResourceService>) -> Router {
    Router::new()
        .route("/api/resources/{account_id}", get(handlers::list_resources))
        .with_state(resource_service)
}
