use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use tracing::debug;

use crate::adapters::bucket_store::{BucketStore, StoreError};

/// Region where S3 rejects an explicit location constraint.
const DEFAULT_S3_REGION: &str = "us-east-1";

#[derive(Debug, Clone)]
pub struct S3BucketStore {
    client: aws_sdk_s3::Client,
}

impl S3BucketStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

impl BucketStore for S3BucketStore {
    fn create_bucket(&self, bucket: &str, region: &str) -> Result<(), StoreError> {
        let bucket_name = bucket.to_string();
        let configuration = (region != DEFAULT_S3_REGION).then(|| {
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(region))
                .build()
        });
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .create_bucket()
                    .bucket(&bucket_name)
                    .set_create_bucket_configuration(configuration)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| store_error("create bucket", &bucket_name, error))
            })
        })
    }

    fn delete_all_objects(&self, bucket: &str) -> Result<usize, StoreError> {
        let bucket_name = bucket.to_string();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                let mut deleted = 0usize;
                let mut continuation_token: Option<String> = None;

                loop {
                    let page = client
                        .list_objects_v2()
                        .bucket(&bucket_name)
                        .set_continuation_token(continuation_token.take())
                        .send()
                        .await
                        .map_err(|error| store_error("list objects in", &bucket_name, error))?;

                    let identifiers = page
                        .contents()
                        .iter()
                        .filter_map(|object| object.key())
                        .map(|key| ObjectIdentifier::builder().key(key).build())
                        .collect::<Result<Vec<_>, _>>()
                        .map_err(|error| {
                            StoreError::Api(format!("invalid object key in {bucket_name}: {error}"))
                        })?;

                    if !identifiers.is_empty() {
                        let batch_len = identifiers.len();
                        let delete = Delete::builder()
                            .set_objects(Some(identifiers))
                            .quiet(true)
                            .build()
                            .map_err(|error| {
                                StoreError::Api(format!(
                                    "failed to build delete request for {bucket_name}: {error}"
                                ))
                            })?;

                        let output = client
                            .delete_objects()
                            .bucket(&bucket_name)
                            .delete(delete)
                            .send()
                            .await
                            .map_err(|error| {
                                store_error("delete objects in", &bucket_name, error)
                            })?;

                        if let Some(failure) = output.errors().first() {
                            return Err(StoreError::Api(format!(
                                "failed to delete object {} in {bucket_name}: {}",
                                failure.key().unwrap_or("<unknown>"),
                                failure
                                    .message()
                                    .or(failure.code())
                                    .unwrap_or("unknown error"),
                            )));
                        }

                        deleted += batch_len;
                        debug!(bucket = %bucket_name, batch_len, deleted, "deleted object batch");
                    }

                    match page.next_continuation_token() {
                        Some(token) if page.is_truncated().unwrap_or(false) => {
                            continuation_token = Some(token.to_string());
                        }
                        _ => break,
                    }
                }

                Ok(deleted)
            })
        })
    }

    fn delete_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        let bucket_name = bucket.to_string();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_bucket()
                    .bucket(&bucket_name)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| store_error("delete bucket", &bucket_name, error))
            })
        })
    }
}

fn store_error<E>(operation: &str, bucket: &str, error: E) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    if error.code() == Some("NoSuchBucket") {
        return StoreError::NoSuchBucket(bucket.to_string());
    }

    match (error.code(), error.message()) {
        (Some(code), Some(message)) => {
            StoreError::Api(format!("failed to {operation} {bucket}: {code}: {message}"))
        }
        _ => StoreError::Api(format!(
            "failed to {operation} {bucket}: {}",
            DisplayErrorContext(&error)
        )),
    }
}
