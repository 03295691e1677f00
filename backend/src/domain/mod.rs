//! Domain model and use-cases.
//!
//! Types here are transport agnostic. HTTP concerns live in
//! `inbound::http`; the upstream terminology client and the document
//! stores sit behind the traits in [`ports`].

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod patient;
pub mod patient_service;
pub mod ports;
pub mod profile;
pub mod profile_service;
pub mod terminology;
pub mod terminology_service;

pub use self::auth::{
    AuthenticatedUser, CredentialError, Credentials, EmailAddress, Password, Signup, UserId,
};
pub use self::dashboard::{DashboardSummary, SystemCounts};
pub use self::error::{Error, ErrorCode};
pub use self::patient::{Gender, IntakeStep, IntakeWizard, PatientDraft, PatientRecord, age_on};
pub use self::patient_service::PatientService;
pub use self::profile::{ProfileUpdate, Theme, UserProfile};
pub use self::profile_service::ProfileService;
pub use self::terminology::{
    AyurvedaTerm, Confidence, IcdMapping, Icd11Term, MappingRecord, MappingSearchOutcome,
    MappingSystem, MappingTerm, MinConfidence, NamasteTerms, SiddhaTerm, System, Term,
    TermSearchOutcome, UnaniTerm,
};
pub use self::terminology_service::TerminologyService;

/// Convenient result alias for fallible domain and handler code.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use ayush_portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
