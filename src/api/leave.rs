use crate::api::reports::parse_month;
use crate::api::working_days::MonthQuery;
use crate::provider::LeaveLedgerProvider;
use actix_web::{HttpResponse, web};
use tracing::error;

/// One user's approved leave days within a month
#[utoipa::path(
    get,
    path = "/api/v1/leave/user/{user_id}/monthly",
    params(
        ("user_id" = u64, Path, description = "User id", example = 42),
        MonthQuery
    ),
    responses(
        (status = 200, description = "Approved leave days clipped to the month", body = Object, example = json!({
            "leave_days": 2
        })),
        (status = 400, description = "Malformed month parameter"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn monthly_leaves(
    leaves: web::Data<dyn LeaveLedgerProvider>,
    path: web::Path<u64>,
    query: web::Query<MonthQuery>,
) -> actix_web::Result<HttpResponse> {
    let user_id = path.into_inner();
    let month = match parse_month(&query.month) {
        Ok(month) => month,
        Err(resp) => return Ok(resp),
    };

    let leave_days = leaves
        .approved_leave_days(user_id, month)
        .await
        .map_err(|e| {
            error!(user_id, %month, error = %e, "failed to fetch approved leaves");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "leave_days": leave_days })))
}

/// Count of leave requests awaiting a decision
#[utoipa::path(
    get,
    path = "/api/v1/leave/pending-count",
    responses(
        (status = 200, description = "Pending request count", body = Object, example = json!({
            "pending_count": 3
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Leave"
)]
pub async fn pending_count(
    leaves: web::Data<dyn LeaveLedgerProvider>,
) -> actix_web::Result<HttpResponse> {
    let pending_count = leaves.pending_count().await.map_err(|e| {
        error!(error = %e, "failed to fetch pending leave count");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "pending_count": pending_count })))
}
