//! Ownership checks for guarded mutations.
//!
//! The inbound guards decide *where* a denied request is redirected; this
//! module only answers whether the acting identity owns the resource. It
//! expects an already-loaded entity; existence is checked by the caller
//! first, so absence surfaces as not-found rather than a permission error.

use super::auth::Identity;
use super::error::Error;
use super::listing::Listing;
use super::review::Review;
use super::user::UserId;

/// User-visible message for denied mutations.
pub const PERMISSION_DENIED: &str = "You do not have permission to do that!";

/// Entities with an immutable owning author.
pub trait Authored {
    /// The user that created this entity.
    fn author(&self) -> &UserId;
}

impl Authored for Listing {
    fn author(&self) -> &UserId {
        Self::author(self)
    }
}

impl Authored for Review {
    fn author(&self) -> &UserId {
        Self::author(self)
    }
}

/// Succeed iff `identity` is the author of `resource`.
pub fn ensure_owner<R: Authored>(identity: &Identity, resource: &R) -> Result<(), Error> {
    if resource.author() == identity.id() {
        Ok(())
    } else {
        Err(Error::forbidden(PERMISSION_DENIED))
    }
}
