//! In-memory document-collection adapters.
//!
//! The resource store is a port; these adapters back it with process-local
//! maps. They are the server's fallback when no external store is configured
//! and the doubles every test drives the application against. Writes follow
//! the document-store model: whole-document replacement, last write wins.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::auth::CredentialRecord;
use crate::domain::listing::{Listing, ListingId};
use crate::domain::ports::{
    ListingRepository, RepositoryError, ReviewRepository, UserRepository,
};
use crate::domain::review::{Review, ReviewId};
use crate::domain::user::{Email, User, UserId, Username};

fn poisoned(which: &str) -> RepositoryError {
    RepositoryError::query(format!("{which} collection lock poisoned"))
}

/// Listing collection held in a process-local map.
#[derive(Default)]
pub struct MemoryListingRepository {
    docs: RwLock<HashMap<ListingId, Listing>>,
}

#[async_trait]
impl ListingRepository for MemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> Result<(), RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("listing"))?;
        docs.insert(*listing.id(), listing.clone());
        Ok(())
    }

    async fn find_all(&self) -> Result<Vec<Listing>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("listing"))?;
        Ok(docs.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("listing"))?;
        Ok(docs.get(id).cloned())
    }

    async fn update(&self, listing: &Listing) -> Result<(), RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("listing"))?;
        docs.insert(*listing.id(), listing.clone());
        Ok(())
    }

    async fn remove(&self, id: &ListingId) -> Result<Option<Listing>, RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("listing"))?;
        Ok(docs.remove(id))
    }

    async fn append_review(
        &self,
        id: &ListingId,
        review: &ReviewId,
    ) -> Result<bool, RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("listing"))?;
        match docs.get_mut(id) {
            Some(listing) => {
                listing.append_review(*review);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn detach_review(
        &self,
        id: &ListingId,
        review: &ReviewId,
    ) -> Result<bool, RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("listing"))?;
        Ok(docs
            .get_mut(id)
            .is_some_and(|listing| listing.detach_review(review)))
    }
}

/// Review collection held in a process-local map.
#[derive(Default)]
pub struct MemoryReviewRepository {
    docs: RwLock<HashMap<ReviewId, Review>>,
}

#[async_trait]
impl ReviewRepository for MemoryReviewRepository {
    async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("review"))?;
        docs.insert(*review.id(), review.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("review"))?;
        Ok(docs.get(id).cloned())
    }

    async fn find_many(&self, ids: &[ReviewId]) -> Result<Vec<Review>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("review"))?;
        Ok(ids.iter().filter_map(|id| docs.get(id).cloned()).collect())
    }

    async fn remove(&self, id: &ReviewId) -> Result<bool, RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("review"))?;
        Ok(docs.remove(id).is_some())
    }
}

#[derive(Default)]
struct UserDocs {
    users: HashMap<UserId, User>,
    credentials: HashMap<UserId, CredentialRecord>,
}

/// User collection with credential records, held in a process-local map.
///
/// Uniqueness of email and username is enforced by scanning; fine at this
/// scale, and the verifier adapter pre-checks both before inserting anyway.
#[derive(Default)]
pub struct MemoryUserRepository {
    docs: RwLock<UserDocs>,
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn insert(
        &self,
        user: &User,
        credential: &CredentialRecord,
    ) -> Result<(), RepositoryError> {
        let mut docs = self.docs.write().map_err(|_| poisoned("user"))?;
        if docs
            .users
            .values()
            .any(|u| u.email() == user.email() || u.username() == user.username())
        {
            return Err(RepositoryError::query("unique index violation"));
        }
        docs.users.insert(*user.id(), user.clone());
        docs.credentials.insert(*user.id(), credential.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("user"))?;
        Ok(docs.users.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("user"))?;
        Ok(docs
            .users
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("user"))?;
        Ok(docs.users.values().find(|u| u.email() == email).cloned())
    }

    async fn credential_for(
        &self,
        id: &UserId,
    ) -> Result<Option<CredentialRecord>, RepositoryError> {
        let docs = self.docs.read().map_err(|_| poisoned("user"))?;
        Ok(docs.credentials.get(id).cloned())
    }
}
