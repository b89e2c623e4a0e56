//! Driven adapters implementing the domain ports.

pub mod credentials;
pub mod media;
pub mod memory;
