use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncRead;

use super::error::StorageError;
use super::hash::ContentHash;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Metadata for an image accepted into the store.
#[derive(Clone, Debug, Serialize)]
pub struct StoredImage {
    pub hash: ContentHash,
    /// Public URL path under which the server serves the image.
    pub url: String,
    /// MIME type guessed from the suggested file name.
    pub content_type: Option<String>,
    pub size: u64,
}

/// Content-addressed store for uploaded review photos.
///
/// Identical bytes deduplicate to a single blob regardless of the
/// suggested name; the name only informs the content type.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Store image bytes and return metadata including the public URL.
    async fn put(&self, data: &[u8], suggested_name: &str) -> Result<StoredImage, StorageError>;

    /// Open a stored image as a streaming async reader.
    async fn get_stream(&self, hash: &ContentHash) -> Result<BoxReader, StorageError>;

    /// Check whether an image exists.
    async fn exists(&self, hash: &ContentHash) -> Result<bool, StorageError>;

    /// Delete an image. Returns `true` if it existed.
    async fn delete(&self, hash: &ContentHash) -> Result<bool, StorageError>;
}

/// Public URL path for a stored image, served by the API.
pub fn public_url(hash: &ContentHash) -> String {
    format!("/api/v1/images/{}", hash.to_hex())
}
