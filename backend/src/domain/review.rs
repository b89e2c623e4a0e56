//! Review entity: rated commentary attached to a listing.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserId;

/// Validation errors returned when constructing review components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewValidationError {
    InvalidId,
    EmptyBody,
    RatingOutOfRange { min: u8, max: u8 },
    InvalidRating,
}

impl fmt::Display for ReviewValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "review id must be a valid UUID"),
            Self::EmptyBody => write!(f, "review body must not be empty"),
            Self::RatingOutOfRange { min, max } => {
                write!(f, "rating must be between {min} and {max}")
            }
            Self::InvalidRating => write!(f, "rating must be a whole number"),
        }
    }
}

impl std::error::Error for ReviewValidationError {}

/// Stable review identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(Uuid);

impl ReviewId {
    /// Validate and construct a [`ReviewId`] from string input.
    pub fn parse(id: impl AsRef<str>) -> Result<Self, ReviewValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| ReviewValidationError::InvalidId)
    }

    /// Generate a new random [`ReviewId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lowest accepted rating.
pub const RATING_MIN: u8 = 1;
/// Highest accepted rating.
pub const RATING_MAX: u8 = 5;

/// Star rating constrained to [`RATING_MIN`]..=[`RATING_MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Validate and construct a [`Rating`].
    pub fn new(value: u8) -> Result<Self, ReviewValidationError> {
        if !(RATING_MIN..=RATING_MAX).contains(&value) {
            return Err(ReviewValidationError::RatingOutOfRange {
                min: RATING_MIN,
                max: RATING_MAX,
            });
        }
        Ok(Self(value))
    }

    /// Parse a rating from form input.
    pub fn parse(raw: &str) -> Result<Self, ReviewValidationError> {
        let value: u8 = raw
            .trim()
            .parse()
            .map_err(|_| ReviewValidationError::InvalidRating)?;
        Self::new(value)
    }

    /// Numeric value of the rating.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review commentary body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewBody(String);

impl ReviewBody {
    /// Validate and construct a [`ReviewBody`], trimming whitespace.
    pub fn new(body: impl Into<String>) -> Result<Self, ReviewValidationError> {
        let trimmed = body.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ReviewValidationError::EmptyBody);
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for ReviewBody {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ReviewBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Review of a listing.
///
/// ## Invariants
/// - `author` is set once at creation and has no mutator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    id: ReviewId,
    body: ReviewBody,
    rating: Rating,
    author: UserId,
}

impl Review {
    /// Create a review authored by `author`.
    pub fn create(body: ReviewBody, rating: Rating, author: UserId) -> Self {
        Self {
            id: ReviewId::random(),
            body,
            rating,
            author,
        }
    }

    /// Stable review identifier.
    pub fn id(&self) -> &ReviewId {
        &self.id
    }

    /// Commentary text.
    pub fn body(&self) -> &ReviewBody {
        &self.body
    }

    /// Star rating.
    pub fn rating(&self) -> Rating {
        self.rating
    }

    /// Authoring user; immutable after creation.
    pub fn author(&self) -> &UserId {
        &self.author
    }
}
