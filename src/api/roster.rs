use crate::model::user::{RosterFilter, UserRef};
use crate::provider::RosterProvider;
use actix_web::{HttpResponse, web};
use tracing::error;

/// Filtered roster listing
#[utoipa::path(
    get,
    path = "/api/v1/roster",
    params(RosterFilter),
    responses(
        (status = 200, description = "Matching users in provider order", body = [UserRef]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Roster"
)]
pub async fn list_roster(
    roster: web::Data<dyn RosterProvider>,
    query: web::Query<RosterFilter>,
) -> actix_web::Result<HttpResponse> {
    let users = roster.roster(&query).await.map_err(|e| {
        error!(error = %e, "failed to fetch roster");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;
    Ok(HttpResponse::Ok().json(users))
}
