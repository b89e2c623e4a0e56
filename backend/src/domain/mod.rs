//! Domain entities, ports, and core services.
//!
//! Everything here is transport-agnostic: HTTP, sessions, and rendering live
//! in `inbound`, concrete stores in `outbound`. The two load-bearing pieces
//! are [`access`] (who may mutate what) and [`cascade`] (cross-collection
//! cleanup on deletion).

pub mod access;
pub mod auth;
pub mod cascade;
pub mod error;
pub mod listing;
pub mod ports;
pub mod review;
pub mod user;

pub use self::auth::{Credentials, Identity, RegistrationDetails};
pub use self::cascade::CascadeService;
pub use self::error::{Error, ErrorCode};
pub use self::listing::{ImageHandle, Listing, ListingId};
pub use self::review::{Review, ReviewId};
pub use self::user::{Email, User, UserId, Username};
