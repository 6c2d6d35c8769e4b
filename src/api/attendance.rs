use crate::api::reports::parse_month;
use crate::api::working_days::MonthQuery;
use crate::config::Config;
use crate::model::event::{AttendanceEvent, EventKind, EventStatus};
use crate::provider::EventStoreProvider;
use actix_web::{HttpResponse, web};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tracing::error;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
#[schema(example = json!({ "user_id": 42, "at": "2025-02-15T09:07:00" }))]
pub struct RecordEventRequest {
    #[schema(example = 42)]
    pub user_id: u64,
    /// Event instant; defaults to the server's current local time.
    #[schema(example = "2025-02-15T09:07:00", value_type = String, format = "date-time", nullable = true)]
    pub at: Option<NaiveDateTime>,
}

/// Record a check-in event
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-in",
    request_body = RecordEventRequest,
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "status": "late"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    events: web::Data<dyn EventStoreProvider>,
    config: web::Data<Config>,
    payload: web::Json<RecordEventRequest>,
) -> actix_web::Result<HttpResponse> {
    let at = payload.at.unwrap_or_else(|| Local::now().naive_local());
    let status = if at.time() > config.late_check_in_cutoff {
        EventStatus::Late
    } else {
        EventStatus::OnTime
    };

    record_event(&events, payload.user_id, at, EventKind::CheckIn, status).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked in successfully",
        "status": status
    })))
}

/// Record a check-out event
#[utoipa::path(
    post,
    path = "/api/v1/attendance/check-out",
    request_body = RecordEventRequest,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully",
            "status": "overtime"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    events: web::Data<dyn EventStoreProvider>,
    config: web::Data<Config>,
    payload: web::Json<RecordEventRequest>,
) -> actix_web::Result<HttpResponse> {
    let at = payload.at.unwrap_or_else(|| Local::now().naive_local());
    let status = if at.time() > config.overtime_check_out_cutoff {
        EventStatus::Overtime
    } else {
        EventStatus::Normal
    };

    record_event(&events, payload.user_id, at, EventKind::CheckOut, status).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully",
        "status": status
    })))
}

/// One user's raw check-ins for a month
#[utoipa::path(
    get,
    path = "/api/v1/attendance/check-ins/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User id", example = 42),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Check-in events, ascending by time", body = [AttendanceEvent]),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_check_ins(
    events: web::Data<dyn EventStoreProvider>,
    path: web::Path<u64>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<HttpResponse> {
    list_events(&events, path.into_inner(), &query.month, EventKind::CheckIn).await
}

/// One user's raw check-outs for a month
#[utoipa::path(
    get,
    path = "/api/v1/attendance/check-outs/{user_id}",
    params(
        ("user_id" = u64, Path, description = "User id", example = 42),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Check-out events, ascending by time", body = [AttendanceEvent]),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn list_check_outs(
    events: web::Data<dyn EventStoreProvider>,
    path: web::Path<u64>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<HttpResponse> {
    list_events(&events, path.into_inner(), &query.month, EventKind::CheckOut).await
}

async fn record_event(
    events: &web::Data<dyn EventStoreProvider>,
    user_id: u64,
    at: NaiveDateTime,
    kind: EventKind,
    status: EventStatus,
) -> actix_web::Result<()> {
    let event = AttendanceEvent {
        user_id,
        time: at,
        kind,
        status,
    };
    events.record(&event).await.map_err(|e| {
        error!(user_id, %kind, error = %e, "failed to record attendance event");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })
}

async fn list_events(
    events: &web::Data<dyn EventStoreProvider>,
    user_id: u64,
    month_raw: &str,
    kind: EventKind,
) -> actix_web::Result<HttpResponse> {
    let month = match parse_month(month_raw) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };

    let result = match kind {
        EventKind::CheckIn => events.check_ins(user_id, month).await,
        EventKind::CheckOut => events.check_outs(user_id, month).await,
    };

    let list = result.map_err(|e| {
        error!(user_id, %month, %kind, error = %e, "failed to fetch events");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(list))
}
