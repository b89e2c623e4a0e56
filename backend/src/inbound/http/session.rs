//! Request-scoped session context.
//!
//! Wraps the Actix session so handlers deal only in domain-friendly
//! operations: the signed-in identity, the flash-notice queue, and the
//! post-login return path. This is the explicit per-request state the rest
//! of the app reads instead of ambient globals.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, Identity};

pub(crate) const IDENTITY_KEY: &str = "identity";
pub(crate) const FLASH_KEY: &str = "flash";
pub(crate) const RETURN_TO_KEY: &str = "return_to";

/// Category of a flash notice; drives styling only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashKind {
    Success,
    Error,
}

/// One-shot notice surfaced on the next rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_identity(&self, identity: &Identity) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, identity)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity from the session, if present.
    ///
    /// A cookie that fails to deserialise is treated as signed-out rather
    /// than an error; tampered cookies should not 500.
    pub fn identity(&self) -> Option<Identity> {
        match self.0.get::<Identity>(IDENTITY_KEY) {
            Ok(identity) => identity,
            Err(error) => {
                tracing::warn!(%error, "unreadable identity in session cookie");
                None
            }
        }
    }

    /// Drop the identity, keeping flash notices intact so a goodbye message
    /// survives the logout redirect.
    pub fn clear_identity(&self) {
        let _removed = self.0.remove(IDENTITY_KEY);
    }

    /// Queue a success notice for the next rendered page.
    pub fn flash_success(&self, text: impl Into<String>) {
        self.push_flash(FlashKind::Success, text.into());
    }

    /// Queue an error notice for the next rendered page.
    pub fn flash_error(&self, text: impl Into<String>) {
        self.push_flash(FlashKind::Error, text.into());
    }

    fn push_flash(&self, kind: FlashKind, text: String) {
        let mut queue = self
            .0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        queue.push(FlashMessage { kind, text });
        if let Err(error) = self.0.insert(FLASH_KEY, queue) {
            tracing::warn!(%error, "failed to queue flash notice");
        }
    }

    /// Drain the flash queue for rendering.
    pub fn take_flash(&self) -> Vec<FlashMessage> {
        let queue = self
            .0
            .get::<Vec<FlashMessage>>(FLASH_KEY)
            .ok()
            .flatten()
            .unwrap_or_default();
        let _removed = self.0.remove(FLASH_KEY);
        queue
    }

    /// Remember where an anonymous user was heading so login can return them.
    pub fn set_return_to(&self, path: impl Into<String>) {
        if let Err(error) = self.0.insert(RETURN_TO_KEY, path.into()) {
            tracing::warn!(%error, "failed to store return path");
        }
    }

    /// Take the stored return path, clearing it from the session.
    pub fn take_return_to(&self) -> Option<String> {
        let path = self.0.get::<String>(RETURN_TO_KEY).ok().flatten();
        let _removed = self.0.remove(RETURN_TO_KEY);
        path
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
    use crate::domain::user::Username;
    use crate::domain::UserId;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn test_identity() -> Identity {
        Identity::new(
            UserId::random(),
            Username::new("session_user").expect("valid username"),
        )
    }

    fn session_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::session_middleware())
    }

    #[actix_web::test]
    async fn identity_round_trips_through_the_cookie() {
        let identity = test_identity();
        let expected = identity.username().to_string();
        let app = test::init_service(
            session_app()
                .route(
                    "/set",
                    web::get().to(move |session: SessionContext| {
                        let identity = identity.clone();
                        async move {
                            session.persist_identity(&identity).expect("persist identity");
                            HttpResponse::Ok().finish()
                        }
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        match session.identity() {
                            Some(identity) => {
                                HttpResponse::Ok().body(identity.username().to_string())
                            }
                            None => HttpResponse::Unauthorized().finish(),
                        }
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(test::read_body(get_res).await, expected.as_bytes());
    }

    #[actix_web::test]
    async fn flash_queue_drains_on_take() {
        let app = test::init_service(
            session_app()
                .route(
                    "/queue",
                    web::get().to(|session: SessionContext| async move {
                        session.flash_success("one");
                        session.flash_error("two");
                        HttpResponse::Ok().finish()
                    }),
                )
                .route(
                    "/drain",
                    web::get().to(|session: SessionContext| async move {
                        let drained = session.take_flash();
                        let again = session.take_flash();
                        HttpResponse::Ok().body(format!("{}/{}", drained.len(), again.len()))
                    }),
                ),
        )
        .await;

        let queue_res =
            test::call_service(&app, test::TestRequest::get().uri("/queue").to_request()).await;
        let cookie = queue_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let drain_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/drain")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(drain_res).await, "2/0".as_bytes());
    }

    #[actix_web::test]
    async fn return_to_is_single_use() {
        let app = test::init_service(
            session_app()
                .route(
                    "/remember",
                    web::get().to(|session: SessionContext| async move {
                        session.set_return_to("/campgrounds/42");
                        HttpResponse::Ok().finish()
                    }),
                )
                .route(
                    "/recall",
                    web::get().to(|session: SessionContext| async move {
                        let first = session.take_return_to().unwrap_or_default();
                        let second = session.take_return_to().unwrap_or_default();
                        HttpResponse::Ok().body(format!("{first}|{second}"))
                    }),
                ),
        )
        .await;

        let remember =
            test::call_service(&app, test::TestRequest::get().uri("/remember").to_request()).await;
        let cookie = remember
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let recall = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/recall")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(recall).await, "/campgrounds/42|".as_bytes());
    }
}
