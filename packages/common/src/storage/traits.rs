use async_trait::async_trait;
use uuid::Uuid;

use super::{ImageCategory, StorageError};

/// Builds the storage key for an uploaded file. A random prefix keeps
/// distinct uploads of the same file name from colliding.
pub fn object_key(original_file_name: &str) -> String {
    format!("{}-{}", Uuid::new_v4(), original_file_name)
}

/// Gateway to the object store backing image uploads and downloads.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `data` in the bucket for `category` under a freshly generated
    /// key and returns that key.
    async fn put(
        &self,
        category: ImageCategory,
        original_file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, StorageError>;

    /// Fetches the object stored under `key` in the bucket for `category`.
    async fn get(&self, category: ImageCategory, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Reports whether `key` exists in the bucket for `category`.
    async fn exists(&self, category: ImageCategory, key: &str) -> Result<bool, StorageError>;
}
