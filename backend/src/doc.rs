//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the OpenAPI specification for the REST API. It
//! registers every HTTP endpoint from the inbound layer, the error schema
//! wrappers, and the session cookie security scheme. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "AYUSH Bandhan portal API",
        description = "Terminology lookup across NAMASTE systems and ICD-11, \
                       with session-authenticated patient registration.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::search::search_mappings,
        crate::inbound::http::search::search_terms,
        crate::inbound::http::search::term_details,
        crate::inbound::http::search::mapping_details,
        crate::inbound::http::profile::get_profile,
        crate::inbound::http::profile::update_profile,
        crate::inbound::http::intake::get_intake,
        crate::inbound::http::intake::update_intake,
        crate::inbound::http::intake::intake_next,
        crate::inbound::http::intake::intake_back,
        crate::inbound::http::intake::intake_submit,
        crate::inbound::http::dashboard::get_dashboard,
        crate::inbound::http::preferences::get_theme,
        crate::inbound::http::preferences::update_theme,
        crate::inbound::http::platform::get_platform,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Account and session management"),
        (name = "terminology", description = "Search across coding systems"),
        (name = "profile", description = "Practitioner profile"),
        (name = "intake", description = "Patient registration wizard"),
        (name = "dashboard", description = "Registration statistics"),
        (name = "preferences", description = "Per-session preferences"),
        (name = "platform", description = "Platform metadata")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn every_portal_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/auth/signup",
            "/api/v1/auth/login",
            "/api/v1/auth/logout",
            "/api/v1/auth/session",
            "/api/v1/mappings/search",
            "/api/v1/systems/{system}/search",
            "/api/v1/details/{system}/{code}",
            "/api/v1/mapping-details/{mapping_id}",
            "/api/v1/profile",
            "/api/v1/intake",
            "/api/v1/intake/next",
            "/api/v1/intake/back",
            "/api/v1/intake/submit",
            "/api/v1/dashboard",
            "/api/v1/preferences/theme",
            "/api/v1/platform",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "missing path: {path}"
            );
        }
    }

    #[test]
    fn the_error_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        // utoipa replaces :: with . in schema names
        assert!(schemas.contains_key("crate.domain.Error"));
        assert!(schemas.contains_key("crate.domain.ErrorCode"));
    }
}
