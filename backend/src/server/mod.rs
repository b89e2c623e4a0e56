//! Server construction and middleware wiring.

mod config;

pub use config::{DEFAULT_PLACEHOLDER_NAME, DEFAULT_PLACEHOLDER_URL, ServerConfig};

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use crate::domain::CascadeService;
use crate::domain::ports::{
    CredentialVerifier, ListingRepository, MediaStore, ReviewRepository, UserRepository,
};
use crate::inbound::http::error::not_found;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::{listings, reviews, users};
use crate::middleware::Trace;
use crate::outbound::credentials::Sha256CredentialVerifier;
use crate::outbound::media::{HttpMediaStore, MemoryMediaStore};
use crate::outbound::memory::{MemoryListingRepository, MemoryReviewRepository, MemoryUserRepository};

/// Session cookie lifetime. Browsers drop the session after a week idle.
const SESSION_TTL_DAYS: i64 = 7;

/// Assemble the shared port wiring for the HTTP handlers.
fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let listings: Arc<dyn ListingRepository> = Arc::new(MemoryListingRepository::default());
    let reviews: Arc<dyn ReviewRepository> = Arc::new(MemoryReviewRepository::default());
    let users: Arc<dyn UserRepository> = Arc::new(MemoryUserRepository::default());
    let media: Arc<dyn MediaStore> = match &config.media_endpoint {
        Some(endpoint) => Arc::new(HttpMediaStore::new(
            reqwest::Client::new(),
            endpoint.clone(),
        )),
        None => Arc::new(MemoryMediaStore::default()),
    };
    let verifier: Arc<dyn CredentialVerifier> = Arc::new(Sha256CredentialVerifier::new(
        Arc::clone(&users),
    ));
    let cascade = Arc::new(CascadeService::new(
        Arc::clone(&listings),
        Arc::clone(&reviews),
        Arc::clone(&media),
        config.placeholder.clone(),
    ));
    web::Data::new(HttpState {
        listings,
        reviews,
        users,
        media,
        verifier,
        cascade,
    })
}

#[derive(Clone)]
struct AppDependencies {
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Register every route on a service config.
///
/// Shared between the server factory and integration tests so both see the
/// same surface.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(users::home)
        .service(users::register_form)
        .service(users::register)
        .service(users::login_form)
        .service(users::login)
        .service(users::logout)
        .service(users::logout_via_form)
        .service(listings::index)
        .service(listings::new_form)
        .service(listings::create)
        .service(listings::show)
        .service(listings::edit_form)
        .service(listings::update)
        .service(listings::update_via_form)
        .service(listings::destroy)
        .service(listings::destroy_via_form)
        .service(reviews::create)
        .service(reviews::destroy)
        .service(reviews::destroy_via_form)
        .default_service(web::to(not_found));
}

/// Build the session middleware used by every route.
pub fn session_middleware(
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::days(SESSION_TTL_DAYS)),
        )
        .build()
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    App::new()
        .app_data(http_state)
        .wrap(session_middleware(key, cookie_secure, same_site))
        .wrap(Trace)
        .configure(routes)
}

/// Construct an Actix HTTP server from the provided configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(config: ServerConfig) -> std::io::Result<Server> {
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        media_endpoint: _,
        placeholder: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    Ok(server)
}
