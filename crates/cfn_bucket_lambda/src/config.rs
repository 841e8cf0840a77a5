//! Process configuration, read once from the environment at start-up.

use std::time::Duration;

use thiserror::Error;

use crate::adapters::http::DEFAULT_CALLBACK_TIMEOUT;
use crate::runtime::policy::{LifecycleProfile, LifecyclePolicies, PolicyParseError};

pub const REGION_VAR: &str = "AWS_REGION";
pub const PROFILE_VAR: &str = "BUCKET_LIFECYCLE_PROFILE";
pub const UPDATE_POLICY_VAR: &str = "BUCKET_UPDATE_POLICY";
pub const DELETE_TARGET_VAR: &str = "BUCKET_DELETE_TARGET";
pub const RESPONSE_DATA_VAR: &str = "BUCKET_RESPONSE_DATA";
pub const CALLBACK_TIMEOUT_VAR: &str = "CALLBACK_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{var}: {source}")]
    InvalidPolicy {
        var: &'static str,
        #[source]
        source: PolicyParseError,
    },
    #[error("{var} must be a positive whole number of seconds, got {value:?}")]
    InvalidTimeout { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub region: String,
    pub policies: LifecyclePolicies,
    pub callback_timeout: Duration,
}

impl HandlerConfig {
    pub fn new(region: impl Into<String>, policies: LifecyclePolicies) -> Self {
        Self {
            region: region.into(),
            policies,
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let region = read(REGION_VAR).ok_or(ConfigError::Missing(REGION_VAR))?;

        let mut policies = match read(PROFILE_VAR) {
            Some(value) => parse_policy::<LifecycleProfile>(PROFILE_VAR, &value)?.policies(),
            None => LifecyclePolicies::default(),
        };
        if let Some(value) = read(UPDATE_POLICY_VAR) {
            policies.update = parse_policy(UPDATE_POLICY_VAR, &value)?;
        }
        if let Some(value) = read(DELETE_TARGET_VAR) {
            policies.delete_target = parse_policy(DELETE_TARGET_VAR, &value)?;
        }
        if let Some(value) = read(RESPONSE_DATA_VAR) {
            policies.response_data = parse_policy(RESPONSE_DATA_VAR, &value)?;
        }

        let callback_timeout = match read(CALLBACK_TIMEOUT_VAR) {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
                _ => {
                    return Err(ConfigError::InvalidTimeout {
                        var: CALLBACK_TIMEOUT_VAR,
                        value,
                    })
                }
            },
            None => DEFAULT_CALLBACK_TIMEOUT,
        };

        Ok(Self {
            region,
            policies,
            callback_timeout,
        })
    }
}

fn parse_policy<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = PolicyParseError>,
{
    value
        .parse()
        .map_err(|source| ConfigError::InvalidPolicy { var, source })
}
