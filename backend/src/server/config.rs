//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use url::Url;

use crate::domain::ImageHandle;

/// Default URL served for listings with no uploaded images.
pub const DEFAULT_PLACEHOLDER_URL: &str = "https://images.unsplash.com/photo-1508873696983-2dfd5898f08b";
/// Media-store filename of the shared placeholder.
pub const DEFAULT_PLACEHOLDER_NAME: &str = "default";

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) media_endpoint: Option<Url>,
    pub(crate) placeholder: ImageHandle,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            media_endpoint: None,
            placeholder: ImageHandle::new(DEFAULT_PLACEHOLDER_URL, DEFAULT_PLACEHOLDER_NAME),
        }
    }

    /// Attach a media host for image storage.
    ///
    /// When absent, uploads are kept by an in-process store, which suits
    /// development and tests but loses files on restart.
    #[must_use]
    pub fn with_media_endpoint(mut self, endpoint: Url) -> Self {
        self.media_endpoint = Some(endpoint);
        self
    }

    /// Override the placeholder image shown for listings with no uploads.
    #[must_use]
    pub fn with_placeholder(mut self, placeholder: ImageHandle) -> Self {
        self.placeholder = placeholder;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
