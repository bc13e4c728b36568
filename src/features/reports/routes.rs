use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::reports::handlers;
use crate::features::reports::services::ReportService;

/// `{id}` is a cloud account id on the bare path and a report id below it
pub fn routes(report_service: Arc<ReportService>) -> Router {
    Router::new()
        .route("/api/reports", post(handlers::create_report))
        .route("/api/reports/{id}", get(handlers::list_account_reports))
        .route("/api/reports/{id}/status", get(handlers::get_report_status))
        .route("/api/reports/{id}/download", get(handlers::download_report))
        .with_state(report_service)
}
