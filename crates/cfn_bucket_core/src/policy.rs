//! Lifecycle policies for the managed bucket.
//!
//! Deployments differ in how an Update is realised, which bucket name a Delete
//! trusts, and whether attributes are returned to the template. A
//! [`LifecycleProfile`] bundles one choice for each so a function can be
//! configured with a single name.

use std::str::FromStr;

use thiserror::Error;

use crate::contract::{BucketProperties, ResponseData, BUCKET_NAME_DATA_KEY};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {setting} value {value:?}; expected one of: {expected}")]
pub struct PolicyParseError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Run Create with the new properties; a changed name changes the physical
    /// id and CloudFormation deletes the old bucket in a follow-up request.
    Replace,
    /// Recreate only when the bucket name changed, tearing the old bucket
    /// down first.
    InPlace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteTarget {
    PhysicalId,
    ResourceProperty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseDataMode {
    Full,
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleProfile {
    Replace,
    InPlace,
    InPlaceMinimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecyclePolicies {
    pub update: UpdatePolicy,
    pub delete_target: DeleteTarget,
    pub response_data: ResponseDataMode,
}

impl LifecycleProfile {
    pub fn policies(self) -> LifecyclePolicies {
        match self {
            Self::Replace => LifecyclePolicies {
                update: UpdatePolicy::Replace,
                delete_target: DeleteTarget::PhysicalId,
                response_data: ResponseDataMode::Full,
            },
            Self::InPlace => LifecyclePolicies {
                update: UpdatePolicy::InPlace,
                delete_target: DeleteTarget::ResourceProperty,
                response_data: ResponseDataMode::Full,
            },
            Self::InPlaceMinimal => LifecyclePolicies {
                update: UpdatePolicy::InPlace,
                delete_target: DeleteTarget::ResourceProperty,
                response_data: ResponseDataMode::Empty,
            },
        }
    }
}

impl LifecyclePolicies {
    /// Later requests find the bucket through `BucketName` rather than the
    /// physical id, so Create cannot fall back to a generated name.
    pub fn requires_explicit_bucket_name(&self) -> bool {
        self.update == UpdatePolicy::InPlace || self.delete_target == DeleteTarget::ResourceProperty
    }
}

impl Default for LifecyclePolicies {
    fn default() -> Self {
        LifecycleProfile::Replace.policies()
    }
}

impl FromStr for LifecycleProfile {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "in-place" => Ok(Self::InPlace),
            "in-place-minimal" => Ok(Self::InPlaceMinimal),
            _ => Err(PolicyParseError {
                setting: "lifecycle profile",
                value: value.to_string(),
                expected: "replace, in-place, in-place-minimal",
            }),
        }
    }
}

impl FromStr for UpdatePolicy {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Ok(Self::Replace),
            "in-place" => Ok(Self::InPlace),
            _ => Err(PolicyParseError {
                setting: "update policy",
                value: value.to_string(),
                expected: "replace, in-place",
            }),
        }
    }
}

impl FromStr for DeleteTarget {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "physical-id" => Ok(Self::PhysicalId),
            "resource-property" => Ok(Self::ResourceProperty),
            _ => Err(PolicyParseError {
                setting: "delete target",
                value: value.to_string(),
                expected: "physical-id, resource-property",
            }),
        }
    }
}

impl FromStr for ResponseDataMode {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "empty" => Ok(Self::Empty),
            _ => Err(PolicyParseError {
                setting: "response data mode",
                value: value.to_string(),
                expected: "full, empty",
            }),
        }
    }
}

impl ResponseDataMode {
    pub fn build(self, bucket_name: &str) -> ResponseData {
        match self {
            Self::Full => ResponseData::from([
                (BUCKET_NAME_DATA_KEY.to_string(), bucket_name.to_string()),
                ("Hello".to_string(), "world".to_string()),
            ]),
            Self::Empty => ResponseData::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePlan {
    /// Provision from the new properties as if the resource were new.
    Recreate,
    Unchanged { bucket_name: String },
    Rename { old_bucket_name: String, new_bucket_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}.BucketName is required")]
pub struct MissingBucketName {
    pub field: &'static str,
}

pub fn plan_update(
    policy: UpdatePolicy,
    old_properties: Option<&BucketProperties>,
    new_properties: &BucketProperties,
) -> Result<UpdatePlan, MissingBucketName> {
    if policy == UpdatePolicy::Replace {
        return Ok(UpdatePlan::Recreate);
    }

    let new_bucket_name = new_properties.bucket_name().ok_or(MissingBucketName {
        field: "ResourceProperties",
    })?;
    let old_bucket_name = old_properties
        .and_then(BucketProperties::bucket_name)
        .ok_or(MissingBucketName {
            field: "OldResourceProperties",
        })?;

    if old_bucket_name == new_bucket_name {
        Ok(UpdatePlan::Unchanged {
            bucket_name: new_bucket_name.to_string(),
        })
    } else {
        Ok(UpdatePlan::Rename {
            old_bucket_name: old_bucket_name.to_string(),
            new_bucket_name: new_bucket_name.to_string(),
        })
    }
}
