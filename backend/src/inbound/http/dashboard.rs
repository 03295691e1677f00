//! Practitioner dashboard HTTP handler.
//!
//! ```text
//! GET /api/v1/dashboard
//! ```

use actix_web::{get, web};

use crate::domain::{ApiResult, DashboardSummary};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration totals, per-system counts, and recent patients.
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    responses(
        (status = 200, description = "Dashboard summary", body = Object),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["dashboard"],
    operation_id = "getDashboard"
)]
#[get("/dashboard")]
pub async fn get_dashboard(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DashboardSummary>> {
    let user_id = session.require_user_id()?;
    let summary = state.patients.dashboard(&user_id).await?;
    Ok(web::Json(summary))
}
