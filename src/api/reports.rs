use crate::export::xlsx;
use crate::model::user::RosterFilter;
use crate::report::month::MonthKey;
use crate::report::service::{DailyGridReport, MonthlySummaryReport, ReportService};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::IntoParams;
use uuid::Uuid;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[derive(Deserialize, IntoParams)]
pub struct ReportQuery {
    /// Target month as YYYY-MM
    #[param(example = "2025-02")]
    pub month: String,
    /// Filter roster by role
    #[param(example = "WH")]
    pub role: Option<String>,
    /// Filter roster by group
    #[param(example = "WH")]
    pub group: Option<String>,
    /// Filter roster by zone
    #[param(example = "RL")]
    pub zone: Option<String>,
}

impl ReportQuery {
    fn roster_filter(&self) -> RosterFilter {
        RosterFilter {
            role: self.role.clone(),
            group: self.group.clone(),
            zone: self.zone.clone(),
        }
    }
}

/// Parses the month parameter, turning a bad key into a 400 response.
pub(crate) fn parse_month(raw: &str) -> Result<MonthKey, HttpResponse> {
    raw.parse().map_err(|e: crate::report::month::MonthKeyError| {
        HttpResponse::BadRequest().json(serde_json::json!({ "message": e.to_string() }))
    })
}

/// Per-user monthly summary report
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary",
    params(ReportQuery),
    responses(
        (status = 200, description = "Monthly summary report, one row per roster member", body = MonthlySummaryReport),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Roster or calendar store unavailable")
    ),
    tag = "Reports"
)]
pub async fn monthly_summary(
    service: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(&query.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };
    let report = build_summary(&service, month, &query).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Monthly summary report as a downloadable spreadsheet
#[utoipa::path(
    get,
    path = "/api/v1/reports/summary/export",
    params(ReportQuery),
    responses(
        (status = 200, description = "xlsx workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Roster or calendar store unavailable")
    ),
    tag = "Reports"
)]
pub async fn monthly_summary_export(
    service: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(&query.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };
    let report = build_summary(&service, month, &query).await?;
    let bytes = xlsx::summary_workbook(&report).map_err(|e| {
        error!(error = %e, "summary export failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(attachment_response(report.month, bytes))
}

/// Day-by-day attendance grid report
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily",
    params(ReportQuery),
    responses(
        (status = 200, description = "Daily grid report, one slot per calendar day per roster member", body = DailyGridReport),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Roster or calendar store unavailable")
    ),
    tag = "Reports"
)]
pub async fn daily_grid(
    service: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(&query.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };
    let report = build_daily(&service, month, &query).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Daily grid report as a downloadable spreadsheet
#[utoipa::path(
    get,
    path = "/api/v1/reports/daily/export",
    params(ReportQuery),
    responses(
        (status = 200, description = "xlsx workbook with merged day headers", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Roster or calendar store unavailable")
    ),
    tag = "Reports"
)]
pub async fn daily_grid_export(
    service: web::Data<ReportService>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(&query.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };
    let report = build_daily(&service, month, &query).await?;
    let bytes = xlsx::daily_grid_workbook(&report).map_err(|e| {
        error!(error = %e, "daily grid export failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(attachment_response(report.month, bytes))
}

async fn build_summary(
    service: &ReportService,
    month: MonthKey,
    query: &ReportQuery,
) -> actix_web::Result<MonthlySummaryReport> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %month, "building monthly summary report");

    service
        .monthly_summary(month, &query.roster_filter())
        .await
        .map_err(|e| {
            error!(correlation_id = %correlation_id, %month, error = %e, "monthly summary report failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

async fn build_daily(
    service: &ReportService,
    month: MonthKey,
    query: &ReportQuery,
) -> actix_web::Result<DailyGridReport> {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, %month, "building daily grid report");

    service
        .daily_grid(month, &query.roster_filter())
        .await
        .map_err(|e| {
            error!(correlation_id = %correlation_id, %month, error = %e, "daily grid report failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })
}

fn attachment_response(month: MonthKey, bytes: Vec<u8>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(XLSX_CONTENT_TYPE)
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"Monthly_Report_{month}.xlsx\""),
        ))
        .body(bytes)
}
