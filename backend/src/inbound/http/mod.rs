//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod dashboard;
pub mod error;
pub mod intake;
pub mod platform;
pub mod preferences;
pub mod profile;
pub mod schemas;
pub mod search;
pub mod session;
pub mod state;
// Not `#[cfg(test)]`: the integration suite in `tests/` links the library
// crate and needs the shared session middleware helper.
#[doc(hidden)]
pub mod test_utils;

/// Register every `/api/v1` endpoint on the given config.
///
/// The caller supplies the surrounding scope and session middleware, which
/// differ between production and tests.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_session)
        .service(search::search_mappings)
        .service(search::search_terms)
        .service(search::term_details)
        .service(search::mapping_details)
        .service(profile::get_profile)
        .service(profile::update_profile)
        .service(intake::get_intake)
        .service(intake::update_intake)
        .service(intake::intake_next)
        .service(intake::intake_back)
        .service(intake::intake_submit)
        .service(dashboard::get_dashboard)
        .service(preferences::get_theme)
        .service(preferences::update_theme)
        .service(platform::get_platform);
}
