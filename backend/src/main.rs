//! Portal entry-point: wires REST endpoints, adapters, and OpenAPI docs.

use std::env;
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite};
use actix_web::{App, HttpServer, web};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};
use url::Url;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use ayush_portal::ApiDoc;
use ayush_portal::Trace;
use ayush_portal::inbound::http::{configure_api, state::HttpState};
use ayush_portal::outbound::memory::{InMemoryIdentity, InMemoryPatientStore, InMemoryProfileStore};
use ayush_portal::outbound::terminology::TerminologyHttpSource;

const DEFAULT_TERMINOLOGY_BASE_URL: &str = "https://terminology.ayushbandhan.example/api";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

fn bind_address(env_value: Option<String>) -> String {
    env_value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let key_path =
        env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
    let key = match std::fs::read(&key_path) {
        Ok(bytes) => Key::derive_from(&bytes),
        Err(e) => {
            let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %key_path, error = %e, "using temporary session key (dev only)");
                Key::generate()
            } else {
                return Err(std::io::Error::other(format!(
                    "failed to read session key at {key_path}: {e}"
                )));
            }
        }
    };

    let cookie_secure = env::var("SESSION_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let base_url = env::var("TERMINOLOGY_BASE_URL")
        .unwrap_or_else(|_| DEFAULT_TERMINOLOGY_BASE_URL.to_owned());
    let base_url = Url::parse(&base_url)
        .map_err(|e| std::io::Error::other(format!("invalid TERMINOLOGY_BASE_URL: {e}")))?;
    let source = TerminologyHttpSource::new(base_url)
        .map_err(|e| std::io::Error::other(format!("terminology source: {e}")))?;

    let state = HttpState::new(
        Arc::new(source),
        Arc::new(InMemoryProfileStore::default()),
        Arc::new(InMemoryPatientStore::default()),
        Arc::new(InMemoryIdentity::default()),
    );

    HttpServer::new(move || build_app(state.clone(), key.clone(), cookie_secure))
        .bind(bind_address(env::var("BIND_ADDR").ok()))?
        .run()
        .await
}

fn build_app(
    state: HttpState,
    key: Key,
    cookie_secure: bool,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .app_data(web::Data::new(state))
        .configure(configure_api);

    #[allow(unused_mut)]
    let mut app = App::new().wrap(Trace).service(api);

    #[cfg(debug_assertions)]
    {
        app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }

    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unset(None, "0.0.0.0:8080")]
    #[case::blank(Some("   ".to_owned()), "0.0.0.0:8080")]
    #[case::set(Some("127.0.0.1:9090".to_owned()), "127.0.0.1:9090")]
    fn bind_address_falls_back_to_the_default(
        #[case] env_value: Option<String>,
        #[case] expected: &str,
    ) {
        assert_eq!(bind_address(env_value), expected);
    }
}
