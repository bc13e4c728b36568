use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath};
use crate::features::reports::dtos::{
    CreateReportDto, ReportResponseDto, ReportStatusResponseDto,
};
use crate::features::reports::services::ReportService;
use crate::shared::types::ErrorResponse;

/// Create a report and queue its generation
///
/// Returns immediately with a `pending` report; poll the status endpoint
/// for the outcome.
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 201, description = "Report created and queued", body = ReportResponseDto),
        (status = 400, description = "Invalid body, unknown account or provider mismatch", body = ErrorResponse),
        (status = 500, description = "Report could not be queued", body = ErrorResponse),
        (status = 503, description = "Report queue is full", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn create_report(
    State(service): State<Arc<ReportService>>,
    AppJson(dto): AppJson<CreateReportDto>,
) -> Result<(StatusCode, Json<ReportResponseDto>)> {
    let report = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(report.into())))
}

/// List the reports of a cloud account
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i32, Path, description = "Cloud account ID")
    ),
    responses(
        (status = 200, description = "Reports of the account, oldest first", body = Vec<ReportResponseDto>)
    ),
    tag = "reports"
)]
pub async fn list_account_reports(
    State(service): State<Arc<ReportService>>,
    AppPath(cloud_account_id): AppPath<i32>,
) -> Result<Json<Vec<ReportResponseDto>>> {
    let reports = service.list_by_account(cloud_account_id).await?;
    Ok(Json(reports.into_iter().map(Into::into).collect()))
}

/// Poll the generation status of a report
#[utoipa::path(
    get,
    path = "/api/reports/{id}/status",
    params(
        ("id" = i32, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Current status", body = ReportStatusResponseDto),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn get_report_status(
    State(service): State<Arc<ReportService>>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<ReportStatusResponseDto>> {
    let report = service.get_by_id(id).await?;
    Ok(Json(report.into()))
}

/// Download the PDF of a completed report
#[utoipa::path(
    get,
    path = "/api/reports/{id}/download",
    params(
        ("id" = i32, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report PDF", content_type = "application/pdf", body = Vec<u8>),
        (status = 400, description = "Report is not completed", body = ErrorResponse),
        (status = 404, description = "Report or file not found", body = ErrorResponse)
    ),
    tag = "reports"
)]
pub async fn download_report(
    State(service): State<Arc<ReportService>>,
    AppPath(id): AppPath<i32>,
) -> Result<impl IntoResponse> {
    let file = service.download(id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.into_body(),
    ))
}
