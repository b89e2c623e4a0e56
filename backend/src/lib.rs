//! Basecamp backend library modules.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Request tracing middleware applied to every route.
pub use middleware::Trace;
