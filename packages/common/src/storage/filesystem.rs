use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::BufReader;

use super::error::StorageError;
use super::hash::ContentHash;
use super::traits::{BoxReader, ImageStore, StoredImage, public_url};

/// Filesystem-backed image store.
///
/// Blobs live in a Git-style sharded layout:
/// `{base_path}/{first 2 hex chars}/{remaining 62 hex chars}`.
/// Writes go through a temp file and an atomic rename so a crashed
/// upload never leaves a partial blob at its final path.
pub struct FilesystemImageStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemImageStore {
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    fn blob_path(&self, hash: &ContentHash) -> PathBuf {
        self.base_path
            .join(hash.shard_prefix())
            .join(hash.shard_suffix())
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ImageStore for FilesystemImageStore {
    async fn put(&self, data: &[u8], suggested_name: &str) -> Result<StoredImage, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let hash = ContentHash::compute(data);
        let content_type = mime_guess::from_path(suggested_name)
            .first()
            .map(|m| m.to_string());
        let stored = StoredImage {
            hash,
            url: public_url(&hash),
            content_type,
            size: data.len() as u64,
        };

        let blob_path = self.blob_path(&hash);
        if blob_path.exists() {
            return Ok(stored);
        }

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Some(parent) = blob_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        if let Err(e) = fs::rename(&temp_path, &blob_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(stored)
    }

    async fn get_stream(&self, hash: &ContentHash) -> Result<BoxReader, StorageError> {
        match fs::File::open(self.blob_path(hash)).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(hash.to_hex()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, hash: &ContentHash) -> Result<bool, StorageError> {
        Ok(fs::try_exists(&self.blob_path(hash)).await?)
    }

    async fn delete(&self, hash: &ContentHash) -> Result<bool, StorageError> {
        match fs::remove_file(self.blob_path(hash)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    async fn temp_store() -> (FilesystemImageStore, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemImageStore::new(dir.path().join("images"), 10 * 1024 * 1024)
            .await
            .unwrap();
        (store, dir)
    }

    async fn read_all(store: &FilesystemImageStore, hash: &ContentHash) -> Vec<u8> {
        let mut reader = store.get_stream(hash).await.unwrap();
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let (store, _dir) = temp_store().await;
        let data = b"jpeg bytes";
        let stored = store.put(data, "warung.jpg").await.unwrap();
        assert_eq!(read_all(&store, &stored.hash).await, data);
    }

    #[tokio::test]
    async fn put_reports_url_and_content_type() {
        let (store, _dir) = temp_store().await;
        let stored = store.put(b"png bytes", "bowl.png").await.unwrap();
        assert_eq!(stored.url, format!("/api/v1/images/{}", stored.hash.to_hex()));
        assert_eq!(stored.content_type.as_deref(), Some("image/png"));
        assert_eq!(stored.size, 9);
    }

    #[tokio::test]
    async fn identical_bytes_deduplicate() {
        let (store, _dir) = temp_store().await;
        let a = store.put(b"same photo", "a.jpg").await.unwrap();
        let b = store.put(b"same photo", "b.jpg").await.unwrap();
        assert_eq!(a.hash, b.hash);

        let shard_dir = store.base_path.join(a.hash.shard_prefix());
        let entries: Vec<_> = std::fs::read_dir(shard_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn size_limit_enforced() {
        let dir = tempfile::tempdir().unwrap();
        let store = FilesystemImageStore::new(dir.path().join("images"), 10)
            .await
            .unwrap();

        let result = store.put(b"more than ten bytes here", "big.jpg").await;
        assert!(matches!(
            result,
            Err(StorageError::SizeLimitExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn get_not_found() {
        let (store, _dir) = temp_store().await;
        let missing = ContentHash::compute(b"never stored");
        assert!(matches!(
            store.get_stream(&missing).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_image() {
        let (store, _dir) = temp_store().await;
        let stored = store.put(b"delete me", "x.jpg").await.unwrap();
        assert!(store.delete(&stored.hash).await.unwrap());
        assert!(!store.exists(&stored.hash).await.unwrap());
        assert!(!store.delete(&stored.hash).await.unwrap());
    }

    #[tokio::test]
    async fn constructor_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("deep/nested/images");
        let _store = FilesystemImageStore::new(base.clone(), 1024).await.unwrap();
        assert!(base.join(".tmp").exists());
    }
}
