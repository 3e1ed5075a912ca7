//! Trait wrapper around the bucket client to allow fake injection during tests.
use crate::FetchError;
use archive_client::{err_status_code, Bucket, StatusCode};
use async_trait::async_trait;

/// A private wrapper around the one object-store method the resolver needs.
#[async_trait]
pub(crate) trait ObjectStore {
    /// Name of the bucket, for error reporting
    fn bucket_name(&self) -> &str;

    async fn get(&self, key: &str) -> Result<Vec<u8>, FetchError>;
}

/// Implementation of the ObjectStore trait for the Bucket client struct, sorting failures into
/// not-found and everything else.
#[async_trait]
impl ObjectStore for Bucket {
    fn bucket_name(&self) -> &str {
        self.name()
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, FetchError> {
        (self as &Bucket)
            .get(key)
            .await
            .map_err(|source| classify(self.name(), key, source))
    }
}

fn classify(bucket: &str, key: &str, source: anyhow::Error) -> FetchError {
    if err_status_code(&source) == Some(StatusCode::NOT_FOUND) {
        FetchError::ObjectNotFound {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        }
    } else {
        FetchError::Transport {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
            source,
        }
    }
}
