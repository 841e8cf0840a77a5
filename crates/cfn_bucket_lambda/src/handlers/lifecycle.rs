use rand::Rng;
use thiserror::Error;
use tracing::{info, warn};

use crate::adapters::bucket_store::{BucketStore, StoreError};
use crate::config::HandlerConfig;
use crate::logging::COMPONENT;
use crate::runtime::contract::{CustomResourceEvent, RequestType, ResponseData, UnsupportedRequestType};
use crate::runtime::naming::resolve_bucket_name;
use crate::runtime::policy::{plan_update, DeleteTarget, MissingBucketName, UpdatePlan};

/// What a successful lifecycle step reports back to CloudFormation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerOutput {
    pub physical_resource_id: Option<String>,
    pub data: ResponseData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error(transparent)]
    UnsupportedRequestType(#[from] UnsupportedRequestType),
    #[error(transparent)]
    MissingBucketName(#[from] MissingBucketName),
    #[error("PhysicalResourceId is required for {0} requests")]
    MissingPhysicalResourceId(RequestType),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub fn handle_lifecycle_request(
    request_type: RequestType,
    event: &CustomResourceEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
    rng: &mut impl Rng,
) -> Result<HandlerOutput, LifecycleError> {
    match request_type {
        RequestType::Create => handle_create(event, config, store, rng),
        RequestType::Update => handle_update(event, config, store, rng),
        RequestType::Delete => handle_delete(event, config, store),
    }
}

/// Creates the bucket named by `BucketName`, or a generated name derived from
/// the logical id when the template leaves it out. Policies that locate the
/// bucket by property on later requests reject a Create without a name before
/// anything is provisioned.
pub fn handle_create(
    event: &CustomResourceEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
    rng: &mut impl Rng,
) -> Result<HandlerOutput, LifecycleError> {
    let explicit_name = event.resource_properties.bucket_name();
    if explicit_name.is_none() && config.policies.requires_explicit_bucket_name() {
        return Err(MissingBucketName {
            field: "ResourceProperties",
        }
        .into());
    }
    let bucket_name = resolve_bucket_name(explicit_name, &event.logical_resource_id, rng);

    store.create_bucket(&bucket_name, &config.region)?;
    info!(
        component = COMPONENT,
        event = "bucket_created",
        bucket = %bucket_name,
        region = %config.region,
    );

    Ok(HandlerOutput {
        data: config.policies.response_data.build(&bucket_name),
        physical_resource_id: Some(bucket_name),
    })
}

pub fn handle_update(
    event: &CustomResourceEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
    rng: &mut impl Rng,
) -> Result<HandlerOutput, LifecycleError> {
    let plan = plan_update(
        config.policies.update,
        event.old_resource_properties.as_ref(),
        &event.resource_properties,
    )?;

    let bucket_name = match plan {
        UpdatePlan::Recreate => return handle_create(event, config, store, rng),
        UpdatePlan::Unchanged { bucket_name } => {
            info!(
                component = COMPONENT,
                event = "bucket_unchanged",
                bucket = %bucket_name,
            );
            bucket_name
        }
        UpdatePlan::Rename {
            old_bucket_name,
            new_bucket_name,
        } => {
            empty_and_delete_bucket(store, &old_bucket_name)?;
            store.create_bucket(&new_bucket_name, &config.region)?;
            info!(
                component = COMPONENT,
                event = "bucket_renamed",
                old_bucket = %old_bucket_name,
                bucket = %new_bucket_name,
                region = %config.region,
            );
            new_bucket_name
        }
    };

    Ok(HandlerOutput {
        data: config.policies.response_data.build(&bucket_name),
        physical_resource_id: Some(bucket_name),
    })
}

pub fn handle_delete(
    event: &CustomResourceEvent,
    config: &HandlerConfig,
    store: &impl BucketStore,
) -> Result<HandlerOutput, LifecycleError> {
    let bucket_name = match config.policies.delete_target {
        DeleteTarget::PhysicalId => event
            .physical_resource_id()
            .ok_or(LifecycleError::MissingPhysicalResourceId(RequestType::Delete))?,
        DeleteTarget::ResourceProperty => {
            event
                .resource_properties
                .bucket_name()
                .ok_or(MissingBucketName {
                    field: "ResourceProperties",
                })?
        }
    };

    empty_and_delete_bucket(store, bucket_name)?;

    Ok(HandlerOutput {
        physical_resource_id: Some(
            event
                .physical_resource_id()
                .unwrap_or(bucket_name)
                .to_string(),
        ),
        data: ResponseData::new(),
    })
}

/// Objects go first; S3 refuses to delete a bucket that still has any.
/// A bucket that is already gone counts as deleted.
fn empty_and_delete_bucket(
    store: &impl BucketStore,
    bucket_name: &str,
) -> Result<(), StoreError> {
    let deleted_objects = match store.delete_all_objects(bucket_name) {
        Ok(count) => count,
        Err(StoreError::NoSuchBucket(_)) => {
            warn!(
                component = COMPONENT,
                event = "bucket_already_absent",
                bucket = %bucket_name,
            );
            return Ok(());
        }
        Err(error) => return Err(error),
    };

    match store.delete_bucket(bucket_name) {
        Ok(()) | Err(StoreError::NoSuchBucket(_)) => {}
        Err(error) => return Err(error),
    }

    info!(
        component = COMPONENT,
        event = "bucket_deleted",
        bucket = %bucket_name,
        deleted_objects,
    );
    Ok(())
}
