//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle via `actix_web::web::Data`, so they depend
//! only on domain ports and the cascade coordinator and stay testable over
//! in-memory adapters.

use std::sync::Arc;

use crate::domain::CascadeService;
use crate::domain::ports::{
    CredentialVerifier, ListingRepository, MediaStore, ReviewRepository, UserRepository,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub listings: Arc<dyn ListingRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub users: Arc<dyn UserRepository>,
    pub media: Arc<dyn MediaStore>,
    pub verifier: Arc<dyn CredentialVerifier>,
    pub cascade: Arc<CascadeService>,
}
