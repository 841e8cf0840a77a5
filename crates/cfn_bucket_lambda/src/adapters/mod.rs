pub mod bucket_store;
pub mod callback;
pub mod http;
pub mod s3;
