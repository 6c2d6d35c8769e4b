use crate::api::reports::parse_month;
use crate::model::working_days::WorkingDaysEntry;
use crate::provider::CalendarProvider;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct MonthQuery {
    /// Month as YYYY-MM
    #[param(example = "2025-02")]
    pub month: String,
}

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "month": "2025-02", "working_days": 24 }))]
pub struct SetWorkingDays {
    #[schema(example = "2025-02")]
    pub month: String,
    #[schema(example = 24, minimum = 1, maximum = 31)]
    pub working_days: u32,
}

/// Working days configured for one month
#[utoipa::path(
    get,
    path = "/api/v1/working-days",
    params(MonthQuery),
    responses(
        (status = 200, description = "Configured entry", body = WorkingDaysEntry),
        (status = 400, description = "Malformed month parameter"),
        (status = 404, description = "Month not configured", body = Object, example = json!({
            "message": "No working days configured for 2025-02"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Working Days"
)]
pub async fn get_working_days(
    calendar: web::Data<dyn CalendarProvider>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(&query.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };

    let days = calendar.working_days(month).await.map_err(|e| {
        error!(%month, error = %e, "failed to fetch working days");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    match days {
        Some(working_days) => Ok(HttpResponse::Ok().json(WorkingDaysEntry {
            month,
            working_days,
        })),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": format!("No working days configured for {month}")
        }))),
    }
}

/// All configured working-days entries of a year
#[utoipa::path(
    get,
    path = "/api/v1/working-days/year/{year}",
    params(
        ("year" = i32, Path, description = "Four-digit year", example = 2025)
    ),
    responses(
        (status = 200, description = "Configured entries in month order", body = [WorkingDaysEntry]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Working Days"
)]
pub async fn year_working_days(
    calendar: web::Data<dyn CalendarProvider>,
    path: web::Path<i32>,
) -> actix_web::Result<HttpResponse> {
    let year = path.into_inner();
    let entries = calendar.year_entries(year).await.map_err(|e| {
        error!(year, error = %e, "failed to fetch year working days");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(entries))
}

/// Configure the working days of a month
#[utoipa::path(
    post,
    path = "/api/v1/working-days",
    request_body = SetWorkingDays,
    responses(
        (status = 200, description = "Entry upserted", body = Object, example = json!({
            "message": "Working days updated"
        })),
        (status = 400, description = "Malformed month or out-of-range value", body = Object, example = json!({
            "message": "Working days must be between 1 and 31"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Working Days"
)]
pub async fn set_working_days(
    calendar: web::Data<dyn CalendarProvider>,
    payload: web::Json<SetWorkingDays>,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(&payload.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };

    if !(1..=31).contains(&payload.working_days) {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Working days must be between 1 and 31"
        })));
    }

    calendar
        .set_working_days(month, payload.working_days)
        .await
        .map_err(|e| {
            error!(%month, error = %e, "failed to set working days");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    info!(%month, working_days = payload.working_days, "working days updated");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Working days updated"
    })))
}
