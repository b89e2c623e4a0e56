//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters:
//! the document store behind the three collections, the remote media store,
//! and the credential verifier. Each trait exposes strongly typed errors so
//! adapters map their failures into predictable variants.

use async_trait::async_trait;
use thiserror::Error;

use super::auth::{CredentialRecord, Credentials, Identity, RegistrationDetails};
use super::listing::{Listing, ListingId};
use super::review::{Review, ReviewId};
use super::user::{Email, User, UserId, Username};

/// Errors surfaced by the document-store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// Store connectivity failures.
    #[error("document store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("document store query failed: {message}")]
    Query { message: String },
}

impl RepositoryError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Errors surfaced by the media-store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaStoreError {
    /// Upload or release call failed at the remote host.
    #[error("media store call failed: {message}")]
    Backend { message: String },
}

impl MediaStoreError {
    /// Helper for backend failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Registration field that collided with an existing account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Email,
    Username,
}

impl IdentityField {
    /// Noun used in user-facing duplicate messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Email => "email address",
            Self::Username => "username",
        }
    }
}

/// Errors surfaced by the credential verifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// Registration targets an email or username that is already taken.
    #[error("an account with that {} already exists", .field.noun())]
    DuplicateIdentity { field: IdentityField },
    /// Username/password pair did not verify.
    #[error("password or username are incorrect")]
    InvalidCredentials,
    /// Verifier infrastructure failure.
    #[error("credential verifier failed: {message}")]
    Backend { message: String },
}

impl CredentialError {
    /// Helper for duplicate registrations.
    pub fn duplicate(field: IdentityField) -> Self {
        Self::DuplicateIdentity { field }
    }

    /// Helper for infrastructure failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Persistence port for the listing collection.
///
/// Review references live inside the listing document; `append_review` and
/// `detach_review` mutate that embedded sequence in place so callers never
/// race a full read-modify-write of the document.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Persist a new listing.
    async fn insert(&self, listing: &Listing) -> Result<(), RepositoryError>;

    /// Fetch every listing, in no guaranteed order.
    async fn find_all(&self) -> Result<Vec<Listing>, RepositoryError>;

    /// Fetch a listing by identifier.
    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;

    /// Replace an existing listing document. Last write wins; there is no
    /// concurrency token.
    async fn update(&self, listing: &Listing) -> Result<(), RepositoryError>;

    /// Fetch-and-remove a listing, returning the removed document so the
    /// caller can clean up its dependents.
    async fn remove(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError>;

    /// Append a review reference to the listing's sequence.
    ///
    /// Returns whether the listing existed.
    async fn append_review(
        &self,
        id: &ListingId,
        review: &ReviewId,
    ) -> Result<bool, RepositoryError>;

    /// Remove a review reference from the listing's sequence.
    ///
    /// Tolerates both a missing listing and an absent reference; returns
    /// whether a reference was actually removed.
    async fn detach_review(
        &self,
        id: &ListingId,
        review: &ReviewId,
    ) -> Result<bool, RepositoryError>;
}

/// Persistence port for the review collection.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Persist a new review.
    async fn insert(&self, review: &Review) -> Result<(), RepositoryError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, RepositoryError>;

    /// Fetch several reviews, preserving the order of `ids`. Missing ids are
    /// skipped rather than erroring.
    async fn find_many(&self, ids: &[ReviewId]) -> Result<Vec<Review>, RepositoryError>;

    /// Delete a review; returns whether it existed.
    async fn remove(&self, id: &ReviewId) -> Result<bool, RepositoryError>;
}

/// Persistence port for the user collection and its credential records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user with its credential record.
    async fn insert(&self, user: &User, credential: &CredentialRecord)
    -> Result<(), RepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by login name.
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, RepositoryError>;

    /// Fetch a user by contact address.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Fetch the credential record for a user.
    async fn credential_for(
        &self,
        id: &UserId,
    ) -> Result<Option<CredentialRecord>, RepositoryError>;
}

/// Remote object store holding listing images.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload image bytes under a unique filename and return the handle.
    async fn store(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<super::listing::ImageHandle, MediaStoreError>;

    /// Release the remote object behind `filename`. Attempted exactly once;
    /// callers treat failures as best-effort cleanup.
    async fn release(&self, filename: &str) -> Result<(), MediaStoreError>;
}

/// Opaque credential capability: registers accounts and verifies logins.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Create an account, rejecting duplicate email or username.
    async fn register(&self, details: &RegistrationDetails) -> Result<User, CredentialError>;

    /// Verify a username/password pair and resolve the identity.
    async fn verify(&self, credentials: &Credentials) -> Result<Identity, CredentialError>;
}
