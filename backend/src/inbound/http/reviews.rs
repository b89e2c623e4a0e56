//! Review handlers, nested under their parent campground.
//!
//! A review is created only against a listing that exists, and the review
//! record is inserted before its reference is appended so the listing never
//! points at a review that is not yet stored.

use actix_web::{HttpRequest, delete, post, web};

use crate::domain::listing::ListingId;
use crate::domain::review::{Review, ReviewId};

use super::error::PageResult;
use super::forms::ReviewForm;
use super::guards::{self, see_other};
use super::map_store_error;
use super::session::SessionContext;
use super::state::HttpState;

/// Create a review on a campground.
#[post("/campgrounds/{id}/reviews")]
pub async fn create(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<String>,
    form: web::Form<ReviewForm>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let Ok(listing_id) = ListingId::parse(path.as_str()) else {
        return Ok(guards::listing_not_found(&session));
    };
    let listing = state
        .listings
        .find_by_id(&listing_id)
        .await
        .map_err(map_store_error)?;
    if listing.is_none() {
        return Ok(guards::listing_not_found(&session));
    }

    let input = form.into_inner().validate()?;
    let review = Review::create(input.body, input.rating, *identity.id());
    state
        .reviews
        .insert(&review)
        .await
        .map_err(map_store_error)?;
    state
        .listings
        .append_review(&listing_id, review.id())
        .await
        .map_err(map_store_error)?;

    session.flash_success("Created new review!");
    Ok(see_other(&format!("/campgrounds/{listing_id}")))
}

async fn apply_destroy(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> PageResult {
    let identity = match guards::require_login(&session, req.uri().path()) {
        Ok(identity) => identity,
        Err(deny) => return Ok(deny),
    };
    let (listing_raw, review_raw) = path.into_inner();
    let Ok(listing_id) = ListingId::parse(&listing_raw) else {
        return Ok(guards::listing_not_found(&session));
    };
    let Ok(review_id) = ReviewId::parse(&review_raw) else {
        session.flash_error("Cannot find this review!");
        return Ok(see_other(&format!("/campgrounds/{listing_id}")));
    };
    let Some(review) = state
        .reviews
        .find_by_id(&review_id)
        .await
        .map_err(map_store_error)?
    else {
        session.flash_error("Cannot find this review!");
        return Ok(see_other(&format!("/campgrounds/{listing_id}")));
    };
    if let Err(deny) = guards::require_owner(&session, &identity, &review, &listing_id) {
        return Ok(deny);
    }

    state.cascade.delete_review(&listing_id, &review_id).await?;
    session.flash_success("Successfully deleted review");
    Ok(see_other(&format!("/campgrounds/{listing_id}")))
}

/// Delete a review (canonical verb).
#[delete("/campgrounds/{id}/reviews/{review_id}")]
pub async fn destroy(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> PageResult {
    apply_destroy(session, state, req, path).await
}

/// Delete a review (HTML form alias).
#[post("/campgrounds/{id}/reviews/{review_id}/delete")]
pub async fn destroy_via_form(
    session: SessionContext,
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> PageResult {
    apply_destroy(session, state, req, path).await
}
