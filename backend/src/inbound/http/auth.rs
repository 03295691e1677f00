//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/signup
//! POST /api/v1/auth/login
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApiResult, AuthenticatedUser, Credentials, Error, Signup};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Sign-up request payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub display_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Login request payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// The identity attached to the caller's session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
}

impl From<AuthenticatedUser> for SessionUserResponse {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            email: user.email.to_string(),
            display_name: user.display_name,
        }
    }
}

/// Create an account and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created and session started", body = SessionUserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signup"
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let signup = Signup::try_from_form(
        payload.display_name,
        payload.email,
        payload.password,
        payload.confirm_password,
    )
    .map_err(|error| Error::invalid_request(error.to_string()))?;
    let user = state.identity.sign_up(&signup).await?;
    session.persist_user(&user.user_id)?;
    Ok(HttpResponse::Created().json(SessionUserResponse::from(user)))
}

/// Verify credentials and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session started", body = SessionUserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = Credentials::try_from_parts(payload.email, payload.password)
        .map_err(|error| Error::invalid_request(error.to_string()))?;
    let user = state.identity.sign_in(&credentials).await?;
    session.persist_user(&user.user_id)?;
    Ok(HttpResponse::Ok().json(SessionUserResponse::from(user)))
}

/// End the session, dropping any in-flight intake draft with it.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Session ended")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The identity behind the current session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Authenticated session", body = SessionUserResponse),
        (status = 401, description = "No authenticated session", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentSession"
)]
#[get("/auth/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SessionUserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.identity.identity(&user_id).await?.ok_or_else(|| {
        // The account vanished underneath the cookie.
        session.purge();
        Error::unauthorized("account no longer exists")
    })?;
    Ok(web::Json(SessionUserResponse::from(user)))
}
