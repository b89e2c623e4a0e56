//! Access-control guards for guarded routes.
//!
//! A denied request is answered with a redirect and a flash notice, never a
//! bare status page: anonymous users go to the login form (with the original
//! path remembered), non-owners go back to the parent listing. Guards return
//! `Err(HttpResponse)` so handlers can bail out with `return Ok(deny)`.
//!
//! Ordering matters: `require_login` runs before a handler loads anything by
//! id; `require_owner` runs only on an already-loaded entity, so a vanished
//! resource surfaces as not-found instead of a permission error.

use actix_web::HttpResponse;
use actix_web::http::header;

use crate::domain::access::{self, Authored};
use crate::domain::cascade::LISTING_NOT_FOUND;
use crate::domain::{Identity, ListingId};

use super::session::SessionContext;

/// User-visible notice when authentication is missing.
pub const SIGN_IN_REQUIRED: &str = "You must be signed in to view this content";

/// A `303 See Other` redirect to `location`.
pub fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Require a signed-in identity.
///
/// On failure, remembers `original_uri` for the post-login redirect, queues
/// a notice, and denies with a redirect to `/login`.
pub fn require_login(
    session: &SessionContext,
    original_uri: &str,
) -> Result<Identity, HttpResponse> {
    match session.identity() {
        Some(identity) => Ok(identity),
        None => {
            session.set_return_to(original_uri);
            session.flash_error(SIGN_IN_REQUIRED);
            Err(see_other("/login"))
        }
    }
}

/// Require that `identity` authored the loaded `resource`.
///
/// On failure, queues a notice and denies with a redirect to the parent
/// listing's detail page.
pub fn require_owner<R: Authored>(
    session: &SessionContext,
    identity: &Identity,
    resource: &R,
    parent: &ListingId,
) -> Result<(), HttpResponse> {
    match access::ensure_owner(identity, resource) {
        Ok(()) => Ok(()),
        Err(error) => {
            session.flash_error(error.message());
            Err(see_other(&format!("/campgrounds/{parent}")))
        }
    }
}

/// Not-found outcome for a listing id with no matching record: notice plus
/// a redirect to the index rather than a dead-end 404.
pub fn listing_not_found(session: &SessionContext) -> HttpResponse {
    session.flash_error(LISTING_NOT_FOUND);
    see_other("/campgrounds")
}
