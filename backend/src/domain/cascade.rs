//! Consistency coordinator for cross-collection cleanup.
//!
//! Deleting a listing must also delete the reviews it references and release
//! its remote images; deleting a review must detach it from the parent
//! listing. There is no transaction across the three stores: the listing
//! removal is the commit point, and dependent cleanup is best-effort:
//! attempted exactly once per item, failures logged, siblings unaffected.
//! A concurrent reader may briefly observe reviews whose listing is already
//! gone; that window is accepted at this scale.

use std::sync::Arc;

use tracing::warn;

use super::error::Error;
use super::listing::{ImageHandle, Listing, ListingId, normalize_images};
use super::ports::{ListingRepository, MediaStore, RepositoryError, ReviewRepository};
use super::review::ReviewId;

/// User-visible message when a listing id matches nothing.
pub const LISTING_NOT_FOUND: &str = "Cannot find this campground!";

fn map_repository_error(error: RepositoryError) -> Error {
    Error::internal(format!("document store failure: {error}"))
}

/// Coordinates listing/review/media cleanup across the store ports.
#[derive(Clone)]
pub struct CascadeService {
    listings: Arc<dyn ListingRepository>,
    reviews: Arc<dyn ReviewRepository>,
    media: Arc<dyn MediaStore>,
    placeholder: ImageHandle,
}

impl CascadeService {
    /// Create a coordinator over the given adapters.
    ///
    /// `placeholder` is the default image handle asserted at the front of
    /// every listing's image sequence.
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        reviews: Arc<dyn ReviewRepository>,
        media: Arc<dyn MediaStore>,
        placeholder: ImageHandle,
    ) -> Self {
        Self {
            listings,
            reviews,
            media,
            placeholder,
        }
    }

    /// Default image handle for new listings.
    pub fn placeholder(&self) -> &ImageHandle {
        &self.placeholder
    }

    /// Delete a listing and cascade to its dependents.
    ///
    /// The listing record is fetched-and-removed first; once that succeeds
    /// the operation reports success regardless of dependent cleanup, whose
    /// failures are logged and otherwise ignored. Returns `NotFound` when no
    /// listing matches `id`, without touching anything else.
    pub async fn delete_listing(&self, id: &ListingId) -> Result<Listing, Error> {
        let removed = self
            .listings
            .remove(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(LISTING_NOT_FOUND))?;

        for review in removed.reviews() {
            match self.reviews.remove(review).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(listing = %id, review = %review, "dangling review reference on delete");
                }
                Err(error) => {
                    warn!(listing = %id, review = %review, %error, "review cleanup failed");
                }
            }
        }

        for image in removed.images() {
            if let Err(error) = self.media.release(&image.filename).await {
                warn!(listing = %id, filename = %image.filename, %error, "image release failed");
            }
        }

        Ok(removed)
    }

    /// Delete a review and detach it from its parent listing.
    ///
    /// Both steps run even when the listing is missing: the detach is an
    /// id-based removal that tolerates absence, and a gone parent is logged
    /// rather than treated as fatal. Returns `NotFound` only when the review
    /// record itself did not exist.
    pub async fn delete_review(&self, listing: &ListingId, review: &ReviewId) -> Result<(), Error> {
        match self.listings.detach_review(listing, review).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(listing = %listing, review = %review, "no review reference to detach");
            }
            Err(error) => {
                warn!(listing = %listing, review = %review, %error, "review detach failed");
            }
        }

        let existed = self
            .reviews
            .remove(review)
            .await
            .map_err(map_repository_error)?;
        if existed {
            Ok(())
        } else {
            Err(Error::not_found("Cannot find this review!"))
        }
    }

    /// Apply an image-set update to a loaded listing and persist it.
    ///
    /// Appends `added`, drops and releases every filename in `deleted`
    /// (each release independent and best-effort), and re-asserts the
    /// placeholder at the front so the sequence is never empty.
    pub async fn update_listing_images(
        &self,
        listing: &mut Listing,
        added: Vec<ImageHandle>,
        deleted: &[String],
    ) -> Result<(), Error> {
        let mut images: Vec<ImageHandle> = listing.images().to_vec();
        images.extend(added);

        for filename in deleted {
            images.retain(|handle| &handle.filename != filename);
            if let Err(error) = self.media.release(filename).await {
                warn!(listing = %listing.id(), filename = %filename, %error, "image release failed");
            }
        }

        listing.set_images(normalize_images(&self.placeholder, images));
        self.listings
            .update(listing)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "cascade_tests.rs"]
mod tests;
