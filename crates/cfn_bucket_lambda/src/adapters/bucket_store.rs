use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("bucket {0} does not exist")]
    NoSuchBucket(String),
    #[error("{0}")]
    Api(String),
}

/// Storage operations the lifecycle handlers need from the bucket provider.
pub trait BucketStore {
    fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StoreError>;

    /// Removes every object in the bucket and returns how many were deleted.
    fn delete_all_objects(&self, bucket: &str) -> Result<usize, StoreError>;

    /// Fails when the bucket still holds objects.
    fn delete_bucket(&self, bucket: &str) -> Result<(), StoreError>;
}
