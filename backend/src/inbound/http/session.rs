//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix cookie session so handlers deal only in domain values:
//! the authenticated user id, the intake wizard state, and the theme
//! preference. Everything lives in one signed cookie, so the wizard draft
//! must stay comfortably under the 4 KB cookie size limit.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, IntakeWizard, Theme, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const WIZARD_KEY: &str = "intake_wizard";
pub(crate) const THEME_KEY: &str = "theme";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's id in the session cookie.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current user id from the session, if present.
    ///
    /// A tampered or stale id is treated as absent rather than an error.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the whole session: identity, wizard state, and preferences.
    pub fn purge(&self) {
        self.0.purge();
    }

    /// The intake wizard state, starting fresh when none is stored.
    pub fn wizard(&self) -> Result<IntakeWizard, Error> {
        let stored = self
            .0
            .get::<IntakeWizard>(WIZARD_KEY)
            .map_err(|error| Error::internal(format!("failed to read wizard state: {error}")))?;
        Ok(stored.unwrap_or_default())
    }

    /// Persist the intake wizard state.
    pub fn store_wizard(&self, wizard: &IntakeWizard) -> Result<(), Error> {
        self.0
            .insert(WIZARD_KEY, wizard)
            .map_err(|error| Error::internal(format!("failed to persist wizard state: {error}")))
    }

    /// Remove the wizard state after a successful submission.
    pub fn clear_wizard(&self) {
        self.0.remove(WIZARD_KEY);
    }

    /// The stored theme preference, defaulting to light.
    pub fn theme(&self) -> Result<Theme, Error> {
        let stored = self
            .0
            .get::<Theme>(THEME_KEY)
            .map_err(|error| Error::internal(format!("failed to read theme: {error}")))?;
        Ok(stored.unwrap_or_default())
    }

    /// Persist the theme preference.
    pub fn store_theme(&self, theme: Theme) -> Result<(), Error> {
        self.0
            .insert(THEME_KEY, theme)
            .map_err(|error| Error::internal(format!("failed to persist theme: {error}")))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn round_trips_user_id() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                            .expect("fixture id");
                        session.persist_user(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[actix_web::test]
    async fn missing_user_is_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_user_id()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn tampered_user_id_is_unauthorised() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(USER_ID_KEY, "not-a-uuid")
                            .expect("set invalid user id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        let _ = session.require_user_id()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn wizard_state_defaults_fresh_and_round_trips() {
        use crate::domain::IntakeStep;

        let app = test::init_service(
            session_test_app()
                .route(
                    "/advance",
                    web::get().to(|session: SessionContext| async move {
                        let mut wizard = session.wizard()?;
                        wizard.step = wizard.step.next();
                        wizard.draft.full_name = Some("Anitha".to_owned());
                        session.store_wizard(&wizard)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/read",
                    web::get().to(|session: SessionContext| async move {
                        let wizard = session.wizard()?;
                        Ok::<_, Error>(HttpResponse::Ok().json(wizard))
                    }),
                ),
        )
        .await;

        let advance_res =
            test::call_service(&app, test::TestRequest::get().uri("/advance").to_request()).await;
        let cookie = session_cookie(&advance_res);

        let read_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/read")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        let wizard: IntakeWizard = test::read_body_json(read_res).await;
        assert_eq!(wizard.step, IntakeStep::Contact);
        assert_eq!(wizard.draft.full_name.as_deref(), Some("Anitha"));
    }
}
