//! AWS-oriented adapters and handlers for the bucket custom resource.
//!
//! This crate owns runtime integration details (the Lambda binary, the S3 and
//! callback adapters, configuration and logging) and re-exports the domain
//! primitives from `cfn_bucket_core` under a single `runtime` module boundary.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;

pub mod runtime {
    pub use cfn_bucket_core::{contract, naming, policy};
}
