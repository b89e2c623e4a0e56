//! Shared harness for the HTTP integration suites.
//!
//! Builds the full route surface over concrete in-memory adapters, keeping
//! handles to them so tests can assert on stored state directly. Session
//! continuity is cookie-based: helpers extract the `session` pair from each
//! response and thread it into the next request.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{test, web};

use backend::domain::CascadeService;
use backend::domain::ImageHandle;
use backend::domain::ports::{
    CredentialVerifier, ListingRepository, MediaStore, ReviewRepository, UserRepository,
};
use backend::inbound::http::HttpState;
use backend::outbound::credentials::Sha256CredentialVerifier;
use backend::outbound::media::MemoryMediaStore;
use backend::outbound::memory::{
    MemoryListingRepository, MemoryReviewRepository, MemoryUserRepository,
};
use backend::server;

pub const PLACEHOLDER_URL: &str = "https://media.test/default.png";
pub const PLACEHOLDER_NAME: &str = "default";

/// Concrete adapters behind the app, retained for direct assertions.
pub struct Harness {
    pub state: web::Data<HttpState>,
    pub listings: Arc<MemoryListingRepository>,
    pub reviews: Arc<MemoryReviewRepository>,
    pub users: Arc<MemoryUserRepository>,
    pub media: Arc<MemoryMediaStore>,
}

impl Harness {
    pub fn new() -> Self {
        let listings = Arc::new(MemoryListingRepository::default());
        let reviews = Arc::new(MemoryReviewRepository::default());
        let users = Arc::new(MemoryUserRepository::default());
        let media = Arc::new(MemoryMediaStore::default());

        let listings_port: Arc<dyn ListingRepository> = listings.clone();
        let reviews_port: Arc<dyn ReviewRepository> = reviews.clone();
        let users_port: Arc<dyn UserRepository> = users.clone();
        let media_port: Arc<dyn MediaStore> = media.clone();
        let verifier: Arc<dyn CredentialVerifier> =
            Arc::new(Sha256CredentialVerifier::new(users_port.clone()));
        let cascade = Arc::new(CascadeService::new(
            listings_port.clone(),
            reviews_port.clone(),
            media_port.clone(),
            ImageHandle::new(PLACEHOLDER_URL, PLACEHOLDER_NAME),
        ));

        let state = web::Data::new(HttpState {
            listings: listings_port,
            reviews: reviews_port,
            users: users_port,
            media: media_port,
            verifier,
            cascade,
        });

        Self {
            state,
            listings,
            reviews,
            users,
            media,
        }
    }
}

/// Session middleware suitable for plaintext test transports.
pub fn test_session_middleware()
-> actix_session::SessionMiddleware<actix_session::storage::CookieSessionStore> {
    server::session_middleware(Key::generate(), false, SameSite::Lax)
}

/// The `session=...` pair from a response, if one was set.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with("session="))
        .and_then(|value| value.split(';').next())
        .map(str::to_owned)
}

/// Prefer the freshly set cookie; otherwise keep the current one.
pub fn next_cookie<B>(res: &ServiceResponse<B>, current: &str) -> String {
    session_cookie(res).unwrap_or_else(|| current.to_owned())
}

/// The `Location` header of a redirect response.
pub fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("Location header")
        .to_owned()
}

pub const MULTIPART_BOUNDARY: &str = "---------------------------basecamp";

/// Encode a `multipart/form-data` body by hand.
///
/// `files` entries are `(field, filename, bytes)` triples.
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; \
                 name=\"{name}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

/// A multipart request carrying the standard listing fields plus `extra`.
pub fn listing_request(
    uri: &str,
    cookie: &str,
    title: &str,
    files: &[(&str, &str, &[u8])],
    extra: &[(&str, &str)],
) -> Request {
    let mut fields = vec![
        ("title", title),
        ("price", "25.00"),
        ("description", "Pines and a cold river."),
        ("location", "Somewhere, USA"),
    ];
    fields.extend_from_slice(extra);
    test::TestRequest::post()
        .uri(uri)
        .insert_header((header::COOKIE, cookie.to_owned()))
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        ))
        .set_payload(multipart_body(&fields, files))
        .to_request()
}

/// Register an account and return the signed-in session cookie.
pub async fn register_user<S, B>(app: &S, username: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/register")
        .set_form([
            ("email", format!("{username}@example.com")),
            ("username", username.to_owned()),
            ("password", "correct horse battery".to_owned()),
        ])
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "registration failed");
    session_cookie(&res).expect("session cookie after registration")
}

/// Create a listing as the given session and return its id segment.
pub async fn create_listing<S, B>(app: &S, cookie: &str, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(
        app,
        listing_request("/campgrounds", cookie, title, &[], &[]),
    )
    .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER, "listing creation failed");
    location(&res)
        .rsplit('/')
        .next()
        .expect("listing id in redirect")
        .to_owned()
}
