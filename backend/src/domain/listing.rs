//! Listing aggregate: the reservable campground entity.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::review::ReviewId;
use super::user::UserId;

/// Validation errors returned when constructing listing components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    InvalidId,
    EmptyTitle,
    TitleTooLong { max: usize },
    EmptyLocation,
    EmptyDescription,
    InvalidPrice,
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "campground id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max } => write!(f, "title must be at most {max} characters"),
            Self::EmptyLocation => write!(f, "location must not be empty"),
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::InvalidPrice => {
                write!(f, "price must be a non-negative amount with at most two decimals")
            }
        }
    }
}

impl std::error::Error for ListingValidationError {}

/// Stable listing identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(Uuid);

impl ListingId {
    /// Validate and construct a [`ListingId`] from string input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, ListingValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ListingValidationError::InvalidId)
    }

    /// Generate a new random [`ListingId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Maximum allowed length for a listing title.
pub const TITLE_MAX: usize = 120;

/// Listing headline shown on index and detail pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    /// Validate and construct a [`Title`], trimming surrounding whitespace.
    pub fn new(title: impl Into<String>) -> Result<Self, ListingValidationError> {
        let trimmed = title.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ListingValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX {
            return Err(ListingValidationError::TitleTooLong { max: TITLE_MAX });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Nightly price held in minor units to keep arithmetic exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(u64);

impl Price {
    /// Parse a decimal form value such as `12`, `12.5`, or `12.50`.
    ///
    /// Negative amounts and more than two decimal places are rejected.
    pub fn parse(raw: &str) -> Result<Self, ListingValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ListingValidationError::InvalidPrice);
        }
        let (whole, frac) = match trimmed.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(ListingValidationError::InvalidPrice);
        }
        if frac.len() > 2 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(ListingValidationError::InvalidPrice);
        }
        let units: u64 = if whole.is_empty() {
            0
        } else {
            whole
                .parse()
                .map_err(|_| ListingValidationError::InvalidPrice)?
        };
        let mut cents: u64 = 0;
        for c in frac.chars() {
            let digit = u64::from(c as u8 - b'0');
            cents = cents * 10 + digit;
        }
        if frac.len() == 1 {
            cents *= 10;
        }
        units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .map(Self)
            .ok_or(ListingValidationError::InvalidPrice)
    }

    /// Amount in minor units (cents).
    pub fn cents(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Opaque reference to a remotely stored image.
///
/// `filename` is the deletable key understood by the media store; `url` is
/// what pages embed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    pub url: String,
    pub filename: String,
}

impl ImageHandle {
    /// Construct a handle from its remote URL and deletable key.
    pub fn new(url: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            filename: filename.into(),
        }
    }
}

/// Mutable listing fields validated as a bundle.
///
/// Used at both creation and update so the author reference never travels
/// with user-editable data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDetails {
    pub title: Title,
    pub price: Price,
    pub description: String,
    pub location: String,
}

/// Campground listing.
///
/// ## Invariants
/// - `author` is set once at creation and has no mutator.
/// - `images` is never empty; its first element is the default placeholder.
/// - `reviews` preserves insertion (creation) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    id: ListingId,
    details: ListingDetails,
    author: UserId,
    images: Vec<ImageHandle>,
    reviews: Vec<ReviewId>,
}

impl Listing {
    /// Create a listing owned by `author`.
    ///
    /// `images` is normalised so the placeholder leads the sequence.
    pub fn create(
        details: ListingDetails,
        author: UserId,
        placeholder: &ImageHandle,
        images: Vec<ImageHandle>,
    ) -> Self {
        Self {
            id: ListingId::random(),
            details,
            author,
            images: normalize_images(placeholder, images),
            reviews: Vec::new(),
        }
    }

    /// Stable listing identifier.
    pub fn id(&self) -> &ListingId {
        &self.id
    }

    /// Owning author; immutable after creation.
    pub fn author(&self) -> &UserId {
        &self.author
    }

    /// Editable field bundle.
    pub fn details(&self) -> &ListingDetails {
        &self.details
    }

    /// Replace the editable fields, leaving author, images, and reviews alone.
    pub fn apply_details(&mut self, details: ListingDetails) {
        self.details = details;
    }

    /// Ordered image handles; first element is the placeholder.
    pub fn images(&self) -> &[ImageHandle] {
        &self.images
    }

    /// Replace the image sequence wholesale. Callers are expected to have
    /// normalised it so the placeholder invariant holds.
    pub fn set_images(&mut self, images: Vec<ImageHandle>) {
        self.images = images;
    }

    /// Ordered review references.
    pub fn reviews(&self) -> &[ReviewId] {
        &self.reviews
    }

    /// Append a review reference, preserving creation order.
    pub fn append_review(&mut self, review: ReviewId) {
        self.reviews.push(review);
    }

    /// Remove exactly the given review reference if present.
    ///
    /// Id-based removal rather than positional, so an already-detached id is
    /// a no-op. Returns whether anything was removed.
    pub fn detach_review(&mut self, review: &ReviewId) -> bool {
        let before = self.reviews.len();
        self.reviews.retain(|r| r != review);
        self.reviews.len() != before
    }
}

/// Ensure `placeholder` appears exactly once, at the front of the sequence.
///
/// Idempotent: feeding the output back in yields the same sequence.
pub fn normalize_images(placeholder: &ImageHandle, images: Vec<ImageHandle>) -> Vec<ImageHandle> {
    let mut normalized = Vec::with_capacity(images.len() + 1);
    normalized.push(placeholder.clone());
    normalized.extend(
        images
            .into_iter()
            .filter(|handle| handle.filename != placeholder.filename),
    );
    normalized
}
