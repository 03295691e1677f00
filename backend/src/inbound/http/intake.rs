//! Patient intake wizard HTTP handlers.
//!
//! ```text
//! GET  /api/v1/intake
//! PUT  /api/v1/intake
//! POST /api/v1/intake/next
//! POST /api/v1/intake/back
//! POST /api/v1/intake/submit
//! ```
//!
//! Wizard state lives in the practitioner's session cookie. Navigation is
//! strictly linear; submission is accepted only from the final page, and a
//! failed submission leaves the draft in place so nothing typed is lost.

use actix_web::{HttpResponse, get, post, put, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ApiResult, Error, IntakeStep, IntakeWizard, PatientDraft, PatientRecord};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Wizard state returned after every intake operation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IntakeResponse {
    #[schema(value_type = String)]
    pub step: IntakeStep,
    /// Zero-based page index.
    pub step_index: usize,
    pub total_steps: usize,
    #[schema(value_type = Object)]
    pub draft: PatientDraft,
    /// Required fields still unanswered, as clients name them.
    pub missing_required_fields: Vec<&'static str>,
}

impl From<IntakeWizard> for IntakeResponse {
    fn from(wizard: IntakeWizard) -> Self {
        let missing_required_fields = wizard.draft.missing_required_fields();
        Self {
            step: wizard.step,
            step_index: wizard.step.index(),
            total_steps: IntakeStep::ALL.len(),
            draft: wizard.draft,
            missing_required_fields,
        }
    }
}

/// Current wizard state, starting a fresh wizard when none exists.
#[utoipa::path(
    get,
    path = "/api/v1/intake",
    responses(
        (status = 200, description = "Wizard state", body = IntakeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["intake"],
    operation_id = "getIntake"
)]
#[get("/intake")]
pub async fn get_intake(session: SessionContext) -> ApiResult<web::Json<IntakeResponse>> {
    session.require_user_id()?;
    let wizard = session.wizard()?;
    Ok(web::Json(IntakeResponse::from(wizard)))
}

/// Replace the draft, keeping the current page.
#[utoipa::path(
    put,
    path = "/api/v1/intake",
    request_body = Object,
    responses(
        (status = 200, description = "Updated wizard state", body = IntakeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["intake"],
    operation_id = "updateIntake"
)]
#[put("/intake")]
pub async fn update_intake(
    session: SessionContext,
    payload: web::Json<PatientDraft>,
) -> ApiResult<web::Json<IntakeResponse>> {
    session.require_user_id()?;
    let mut wizard = session.wizard()?;
    wizard.draft = payload.into_inner();
    session.store_wizard(&wizard)?;
    Ok(web::Json(IntakeResponse::from(wizard)))
}

/// Advance to the next page, saturating at the last.
#[utoipa::path(
    post,
    path = "/api/v1/intake/next",
    responses(
        (status = 200, description = "Updated wizard state", body = IntakeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["intake"],
    operation_id = "intakeNext"
)]
#[post("/intake/next")]
pub async fn intake_next(session: SessionContext) -> ApiResult<web::Json<IntakeResponse>> {
    session.require_user_id()?;
    let mut wizard = session.wizard()?;
    wizard.step = wizard.step.next();
    session.store_wizard(&wizard)?;
    Ok(web::Json(IntakeResponse::from(wizard)))
}

/// Return to the previous page, saturating at the first.
#[utoipa::path(
    post,
    path = "/api/v1/intake/back",
    responses(
        (status = 200, description = "Updated wizard state", body = IntakeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["intake"],
    operation_id = "intakeBack"
)]
#[post("/intake/back")]
pub async fn intake_back(session: SessionContext) -> ApiResult<web::Json<IntakeResponse>> {
    session.require_user_id()?;
    let mut wizard = session.wizard()?;
    wizard.step = wizard.step.back();
    session.store_wizard(&wizard)?;
    Ok(web::Json(IntakeResponse::from(wizard)))
}

/// Submit the completed draft as a patient registration.
#[utoipa::path(
    post,
    path = "/api/v1/intake/submit",
    responses(
        (status = 201, description = "Registration stored", body = Object),
        (status = 400, description = "Draft incomplete or not on the final page", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable, draft preserved", body = ErrorSchema)
    ),
    tags = ["intake"],
    operation_id = "intakeSubmit"
)]
#[post("/intake/submit")]
pub async fn intake_submit(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let wizard = session.wizard()?;
    if !wizard.step.is_last() {
        return Err(Error::invalid_request(
            "submission is only allowed from the final page",
        ));
    }
    // On any error the wizard stays in the session untouched.
    let record: PatientRecord = state.patients.register(user_id, &wizard.draft).await?;
    session.clear_wizard();
    Ok(HttpResponse::Created().json(record))
}
