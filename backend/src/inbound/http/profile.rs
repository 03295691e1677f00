//! Practitioner profile HTTP handlers.
//!
//! ```text
//! GET /api/v1/profile
//! PUT /api/v1/profile
//! ```

use actix_web::{get, put, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApiResult, ProfileUpdate, UserProfile};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Profile response payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: Option<u32>,
    #[schema(value_type = Option<String>)]
    pub gender: Option<crate::domain::Gender>,
    pub dob: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub specialty: Option<String>,
    pub education: Option<String>,
    pub experience: Option<String>,
    pub availability: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            user_id: profile.user_id.to_string(),
            name: profile.name,
            email: profile.email.to_string(),
            age: profile.age,
            gender: profile.gender,
            dob: profile.dob.map(|d| d.to_string()),
            phone: profile.phone,
            address: profile.address,
            city: profile.city,
            state: profile.state,
            zip: profile.zip,
            specialty: profile.specialty,
            education: profile.education,
            experience: profile.experience,
            availability: profile.availability,
            photo_url: profile.photo_url,
            created_at: profile.created_at.to_rfc3339(),
            updated_at: profile.updated_at.to_rfc3339(),
        }
    }
}

/// Fetch the authenticated practitioner's profile.
///
/// A profile is seeded from the identity record on first load.
#[utoipa::path(
    get,
    path = "/api/v1/profile",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getProfile"
)]
#[get("/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state.profiles.load_or_create(&user_id).await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}

/// Update the profile with merge semantics.
///
/// Fields absent from the payload are preserved; a name change is also
/// pushed to the identity record.
#[utoipa::path(
    put,
    path = "/api/v1/profile",
    request_body = Object,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "updateProfile"
)]
#[put("/profile")]
pub async fn update_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ProfileUpdate>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user_id = session.require_user_id()?;
    let profile = state
        .profiles
        .apply_update(&user_id, payload.into_inner())
        .await?;
    Ok(web::Json(ProfileResponse::from(profile)))
}
