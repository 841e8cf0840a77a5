use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_FAILURE_REASON: &str = "See CloudWatch Logs";
pub const BUCKET_NAME_DATA_KEY: &str = "MyBucketName";

/// Key/value pairs exposed to the template author through `Fn::GetAtt`.
pub type ResponseData = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported request type: {0:?}")]
pub struct UnsupportedRequestType(pub String);

impl FromStr for RequestType {
    type Err = UnsupportedRequestType;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Create" => Ok(Self::Create),
            "Update" => Ok(Self::Update),
            "Delete" => Ok(Self::Delete),
            other => Err(UnsupportedRequestType(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketProperties {
    #[serde(
        rename = "BucketName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub bucket_name: Option<String>,
}

impl BucketProperties {
    pub fn named(bucket_name: impl Into<String>) -> Self {
        Self {
            bucket_name: Some(bucket_name.into()),
        }
    }

    /// The configured bucket name as written; all-whitespace values count as
    /// absent.
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

/// A CloudFormation custom-resource request as delivered to the function.
///
/// `RequestType` is kept as raw text so an unknown verb can still be answered
/// with a FAILED response instead of being rejected while decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceEvent {
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default)]
    pub resource_properties: BucketProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_resource_properties: Option<BucketProperties>,
}

impl CustomResourceEvent {
    pub fn request_type(&self) -> Result<RequestType, UnsupportedRequestType> {
        self.request_type.as_deref().unwrap_or_default().parse()
    }

    pub fn physical_resource_id(&self) -> Option<&str> {
        self.physical_resource_id
            .as_deref()
            .filter(|value| !value.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Body PUT to the pre-signed `ResponseURL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ResponseEnvelope {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub data: ResponseData,
}

impl ResponseEnvelope {
    pub fn for_event(
        event: &CustomResourceEvent,
        status: ResponseStatus,
        reason: impl Into<String>,
        physical_resource_id: impl Into<String>,
        data: ResponseData,
    ) -> Self {
        Self {
            status,
            reason: reason.into(),
            physical_resource_id: physical_resource_id.into(),
            stack_id: event.stack_id.clone(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            data,
        }
    }
}
