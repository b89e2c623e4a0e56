//! Media store adapters.
//!
//! `HttpMediaStore` talks to the remote image host over its minimal REST
//! surface; `MemoryMediaStore` keeps handles in memory for development and
//! tests, recording every release so cascade behaviour can be asserted.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::domain::listing::ImageHandle;
use crate::domain::ports::{MediaStore, MediaStoreError};

/// Remote media host client.
///
/// Uploads `PUT {base}/media/{filename}` with the raw bytes and expects a
/// JSON body carrying the public URL; releases `DELETE {base}/media/{filename}`.
#[derive(Clone)]
pub struct HttpMediaStore {
    client: reqwest::Client,
    base: Url,
}

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpMediaStore {
    /// Create a client for the media host at `base`.
    pub fn new(client: reqwest::Client, base: Url) -> Self {
        Self { client, base }
    }

    fn object_url(&self, filename: &str) -> Result<Url, MediaStoreError> {
        self.base
            .join(&format!("media/{filename}"))
            .map_err(|error| MediaStoreError::backend(format!("bad object url: {error}")))
    }
}

#[async_trait]
impl MediaStore for HttpMediaStore {
    async fn store(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<ImageHandle, MediaStoreError> {
        let url = self.object_url(filename)?;
        let response = self
            .client
            .put(url)
            .body(bytes)
            .send()
            .await
            .map_err(|error| MediaStoreError::backend(format!("upload failed: {error}")))?
            .error_for_status()
            .map_err(|error| MediaStoreError::backend(format!("upload rejected: {error}")))?;
        let payload: UploadResponse = response
            .json()
            .await
            .map_err(|error| MediaStoreError::backend(format!("bad upload response: {error}")))?;
        Ok(ImageHandle::new(payload.url, filename))
    }

    async fn release(&self, filename: &str) -> Result<(), MediaStoreError> {
        let url = self.object_url(filename)?;
        self.client
            .delete(url)
            .send()
            .await
            .map_err(|error| MediaStoreError::backend(format!("release failed: {error}")))?
            .error_for_status()
            .map_err(|error| MediaStoreError::backend(format!("release rejected: {error}")))?;
        Ok(())
    }
}

/// Process-local media store used when no remote host is configured.
#[derive(Default)]
pub struct MemoryMediaStore {
    released: Mutex<Vec<String>>,
}

impl MemoryMediaStore {
    /// Filenames released so far, in call order.
    pub fn released(&self) -> Vec<String> {
        self.released
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn store(
        &self,
        filename: &str,
        _bytes: Vec<u8>,
    ) -> Result<ImageHandle, MediaStoreError> {
        Ok(ImageHandle::new(
            format!("memory://media/{filename}"),
            filename,
        ))
    }

    async fn release(&self, filename: &str) -> Result<(), MediaStoreError> {
        let mut released = self
            .released
            .lock()
            .map_err(|_| MediaStoreError::backend("release log poisoned"))?;
        released.push(filename.to_owned());
        Ok(())
    }
}
