pub mod storage;

pub use storage::{ContentHash, ImageStore, StorageError, StoredImage};
