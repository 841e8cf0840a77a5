//! Shared custom-resource domain primitives.
//!
//! This crate owns the CloudFormation request/response contract, bucket naming
//! and the lifecycle policies that decide what a Create/Update/Delete means for
//! the managed bucket. It intentionally excludes AWS SDK and Lambda runtime
//! concerns, which live in `cfn_bucket_lambda`.

pub mod contract;
pub mod naming;
pub mod policy;
