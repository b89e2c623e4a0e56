//! Registration, login, and logout handlers.
//!
//! Successful registration signs the new user in immediately. Login honours
//! the remembered pre-login path when one exists, then falls back to the
//! campground index. Credential failures are shown as flash notices on the
//! form they came from, never as bare status pages.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, post, web};

use crate::domain::ports::CredentialError;
use crate::domain::{Error, Identity};

use super::error::PageResult;
use super::forms::{LoginForm, RegisterForm};
use super::guards::see_other;
use super::session::SessionContext;
use super::state::HttpState;
use super::views;

fn page(html: String) -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::html()).body(html)
}

/// Map a verifier failure onto the response for an auth form.
///
/// Expected failures (duplicates, bad credentials) flash their message and
/// bounce back to `retry_path`; infrastructure failures become a 500.
fn credential_failure(
    session: &SessionContext,
    error: CredentialError,
    retry_path: &str,
) -> Result<HttpResponse, Error> {
    match error {
        CredentialError::DuplicateIdentity { .. } | CredentialError::InvalidCredentials => {
            session.flash_error(error.to_string());
            Ok(see_other(retry_path))
        }
        CredentialError::Backend { message } => Err(Error::internal(message)),
    }
}

/// Landing page.
#[get("/")]
pub async fn home(session: SessionContext) -> PageResult {
    Ok(page(views::home(
        session.identity().as_ref(),
        &session.take_flash(),
    )))
}

/// Registration form.
#[get("/register")]
pub async fn register_form(session: SessionContext) -> PageResult {
    Ok(page(views::register(
        session.identity().as_ref(),
        &session.take_flash(),
    )))
}

/// Create an account and sign its owner in.
#[post("/register")]
pub async fn register(
    session: SessionContext,
    state: web::Data<HttpState>,
    form: web::Form<RegisterForm>,
) -> PageResult {
    let details = form.into_inner().validate()?;
    let user = match state.verifier.register(&details).await {
        Ok(user) => user,
        Err(error) => return Ok(credential_failure(&session, error, "/register")?),
    };

    let identity = Identity::from(&user);
    session.persist_identity(&identity)?;
    session.flash_success(format!("Welcome to Basecamp, {}!", identity.username()));
    Ok(see_other("/campgrounds"))
}

/// Login form.
#[get("/login")]
pub async fn login_form(session: SessionContext) -> PageResult {
    Ok(page(views::login(
        session.identity().as_ref(),
        &session.take_flash(),
    )))
}

/// Verify credentials and start a session.
#[post("/login")]
pub async fn login(
    session: SessionContext,
    state: web::Data<HttpState>,
    form: web::Form<LoginForm>,
) -> PageResult {
    let credentials = form.into_inner().validate()?;
    let identity = match state.verifier.verify(&credentials).await {
        Ok(identity) => identity,
        Err(error) => return Ok(credential_failure(&session, error, "/login")?),
    };

    session.persist_identity(&identity)?;
    session.flash_success("Welcome back!");
    let destination = session
        .take_return_to()
        .unwrap_or_else(|| "/campgrounds".to_owned());
    Ok(see_other(&destination))
}

fn end_session(session: &SessionContext) -> HttpResponse {
    session.clear_identity();
    session.flash_success("Goodbye!");
    see_other("/campgrounds")
}

/// End the session. Idempotent; signing out while signed out still greets.
#[get("/logout")]
pub async fn logout(session: SessionContext) -> PageResult {
    Ok(end_session(&session))
}

/// End the session (HTML form alias).
#[post("/logout")]
pub async fn logout_via_form(session: SessionContext) -> PageResult {
    Ok(end_session(&session))
}
