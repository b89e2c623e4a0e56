//! HTTP inbound adapter: route handlers, forms, views, and session plumbing.

use crate::domain::Error;
use crate::domain::ports::{MediaStoreError, RepositoryError};

pub mod error;
pub mod forms;
pub mod guards;
pub mod listings;
pub mod reviews;
pub mod session;
pub mod state;
pub mod users;
pub mod views;

#[cfg(test)]
pub(crate) mod test_utils;

pub use error::PageResult;
pub use state::HttpState;

/// Surface a repository failure as an opaque internal error.
pub(crate) fn map_store_error(error: RepositoryError) -> Error {
    Error::internal(error.to_string())
}

/// Surface a media-store failure as an opaque internal error.
pub(crate) fn map_media_error(error: MediaStoreError) -> Error {
    Error::internal(error.to_string())
}
