//! Theme preference HTTP handlers.
//!
//! ```text
//! GET /api/v1/preferences/theme
//! PUT /api/v1/preferences/theme
//! ```
//!
//! The theme is a per-browser-session preference, stored in the session
//! cookie and available before login.

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, Theme};
use crate::inbound::http::session::SessionContext;

/// Theme payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThemeBody {
    #[schema(value_type = String, example = "dark")]
    pub theme: Theme,
}

/// The stored theme, defaulting to light.
#[utoipa::path(
    get,
    path = "/api/v1/preferences/theme",
    responses((status = 200, description = "Current theme", body = ThemeBody)),
    tags = ["preferences"],
    operation_id = "getTheme"
)]
#[get("/preferences/theme")]
pub async fn get_theme(session: SessionContext) -> ApiResult<web::Json<ThemeBody>> {
    Ok(web::Json(ThemeBody {
        theme: session.theme()?,
    }))
}

/// Store a theme preference.
#[utoipa::path(
    put,
    path = "/api/v1/preferences/theme",
    request_body = ThemeBody,
    responses((status = 200, description = "Stored theme", body = ThemeBody)),
    tags = ["preferences"],
    operation_id = "updateTheme"
)]
#[put("/preferences/theme")]
pub async fn update_theme(
    session: SessionContext,
    payload: web::Json<ThemeBody>,
) -> ApiResult<web::Json<ThemeBody>> {
    let body = payload.into_inner();
    session.store_theme(body.theme)?;
    Ok(web::Json(body))
}
