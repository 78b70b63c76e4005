use async_trait::async_trait;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{error, info};

use super::{ImageCategory, ObjectStore, StorageError, object_key};

/// Connection settings for an S3-compatible object store.
#[derive(Clone, Debug)]
pub struct S3Config {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Object store gateway backed by an S3-compatible service such as MinIO.
/// Uses path-style addressing so bucket names never become DNS labels.
pub struct S3ObjectStore {
    config: S3Config,
}

impl S3ObjectStore {
    pub fn new(config: S3Config) -> Self {
        Self { config }
    }

    fn region(&self) -> Region {
        Region::Custom {
            region: self.config.region.clone(),
            endpoint: self.config.endpoint.clone(),
        }
    }

    fn credentials(&self) -> Result<Credentials, StorageError> {
        Credentials::new(
            Some(&self.config.access_key),
            Some(&self.config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| StorageError::Access(e.to_string()))
    }

    fn bucket(&self, category: ImageCategory) -> Result<Box<Bucket>, StorageError> {
        let bucket = Bucket::new(category.bucket_name(), self.region(), self.credentials()?)
            .map_err(|e| StorageError::Access(e.to_string()))?;
        Ok(bucket.with_path_style())
    }

    /// Creates the buckets this service writes to. Buckets that already
    /// exist are left untouched.
    pub async fn ensure_buckets(&self) -> Result<(), StorageError> {
        for category in [ImageCategory::Brand, ImageCategory::Product] {
            let result = Bucket::create_with_path_style(
                category.bucket_name(),
                self.region(),
                self.credentials()?,
                BucketConfiguration::default(),
            )
            .await;
            match result {
                Ok(_) => info!(bucket = category.bucket_name(), "bucket ready"),
                Err(e) if bucket_already_exists(&e) => {}
                Err(e) => {
                    error!(bucket = category.bucket_name(), error = %e, "failed to create bucket");
                    return Err(StorageError::Access(e.to_string()));
                }
            }
        }
        Ok(())
    }
}

fn is_not_found(error: &S3Error) -> bool {
    matches!(error, S3Error::HttpFailWithBody(404, _))
}

fn bucket_already_exists(error: &S3Error) -> bool {
    match error {
        S3Error::HttpFailWithBody(409, body) => body.contains("BucketAlreadyOwnedByYou")
            || body.contains("BucketAlreadyExists"),
        _ => false,
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(
        &self,
        category: ImageCategory,
        original_file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<String, StorageError> {
        let key = object_key(original_file_name);
        let bucket = self.bucket(category)?;
        bucket
            .put_object_with_content_type(&key, data, content_type)
            .await
            .map_err(|e| {
                error!(bucket = category.bucket_name(), key = %key, error = %e, "failed to store object");
                StorageError::Access(e.to_string())
            })?;
        info!(bucket = category.bucket_name(), key = %key, "stored object");
        Ok(key)
    }

    async fn get(&self, category: ImageCategory, key: &str) -> Result<Vec<u8>, StorageError> {
        let bucket = self.bucket(category)?;
        match bucket.get_object(key).await {
            Ok(response) => Ok(response.bytes().to_vec()),
            Err(e) if is_not_found(&e) => Err(StorageError::NotFound(key.to_string())),
            Err(e) => {
                error!(bucket = category.bucket_name(), key, error = %e, "failed to fetch object");
                Err(StorageError::Access(e.to_string()))
            }
        }
    }

    async fn exists(&self, category: ImageCategory, key: &str) -> Result<bool, StorageError> {
        let bucket = self.bucket(category)?;
        match bucket.get_object(key).await {
            Ok(_) => Ok(true),
            Err(e) if is_not_found(&e) => Ok(false),
            Err(e) => {
                error!(bucket = category.bucket_name(), key, error = %e, "failed to check object");
                Err(StorageError::Access(e.to_string()))
            }
        }
    }
}
