#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use cfn_bucket_lambda::adapters::bucket_store::{BucketStore, StoreError};
use cfn_bucket_lambda::adapters::callback::{CallbackTransport, TransportError};
use cfn_bucket_lambda::handlers::notify::InvocationContext;
use cfn_bucket_lambda::runtime::contract::{CustomResourceEvent, ResponseEnvelope};
use serde_json::{json, Value};

pub const LOG_STREAM: &str = "2026/10/17/[$LATEST]0123456789abcdef";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageOp {
    Create(String),
    DeleteObjects(String),
    DeleteBucket(String),
}

/// In-memory bucket provider with S3's ordering rules: names are unique and a
/// bucket must be empty before it can be deleted.
#[derive(Default)]
pub struct InMemoryBuckets {
    buckets: Mutex<BTreeMap<String, usize>>,
    ops: Mutex<Vec<StorageOp>>,
}

impl InMemoryBuckets {
    pub fn with_bucket(name: &str, objects: usize) -> Self {
        let store = Self::default();
        store
            .buckets
            .lock()
            .expect("poisoned mutex")
            .insert(name.to_string(), objects);
        store
    }

    pub fn ops(&self) -> Vec<StorageOp> {
        self.ops.lock().expect("poisoned mutex").clone()
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets
            .lock()
            .expect("poisoned mutex")
            .keys()
            .cloned()
            .collect()
    }

    fn record(&self, op: StorageOp) {
        self.ops.lock().expect("poisoned mutex").push(op);
    }
}

impl BucketStore for InMemoryBuckets {
    fn create_bucket(&self, bucket: &str, _region: &str) -> Result<(), StoreError> {
        self.record(StorageOp::Create(bucket.to_string()));
        let mut buckets = self.buckets.lock().expect("poisoned mutex");
        if buckets.contains_key(bucket) {
            return Err(StoreError::Api(format!(
                "failed to create bucket {bucket}: BucketAlreadyOwnedByYou: Your previous request to create the named bucket succeeded and you already own it."
            )));
        }
        buckets.insert(bucket.to_string(), 0);
        Ok(())
    }

    fn delete_all_objects(&self, bucket: &str) -> Result<usize, StoreError> {
        self.record(StorageOp::DeleteObjects(bucket.to_string()));
        let mut buckets = self.buckets.lock().expect("poisoned mutex");
        match buckets.get_mut(bucket) {
            Some(objects) => Ok(std::mem::take(objects)),
            None => Err(StoreError::NoSuchBucket(bucket.to_string())),
        }
    }

    fn delete_bucket(&self, bucket: &str) -> Result<(), StoreError> {
        self.record(StorageOp::DeleteBucket(bucket.to_string()));
        let mut buckets = self.buckets.lock().expect("poisoned mutex");
        match buckets.get(bucket) {
            None => Err(StoreError::NoSuchBucket(bucket.to_string())),
            Some(0) => {
                buckets.remove(bucket);
                Ok(())
            }
            Some(_) => Err(StoreError::Api(format!(
                "failed to delete bucket {bucket}: BucketNotEmpty: The bucket you tried to delete is not empty"
            ))),
        }
    }
}

#[derive(Default)]
pub struct CapturingCallback {
    requests: Mutex<Vec<(String, Vec<u8>)>>,
}

impl CapturingCallback {
    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    pub fn envelopes(&self) -> Vec<ResponseEnvelope> {
        self.requests
            .lock()
            .expect("poisoned mutex")
            .iter()
            .map(|(_, body)| serde_json::from_slice(body).expect("body should be an envelope"))
            .collect()
    }

    pub fn single_envelope(&self) -> ResponseEnvelope {
        let envelopes = self.envelopes();
        assert_eq!(envelopes.len(), 1, "exactly one response per invocation");
        envelopes.into_iter().next().expect("one envelope")
    }
}

impl CallbackTransport for CapturingCallback {
    fn put(&self, url: &str, body: &[u8]) -> Result<(), TransportError> {
        self.requests
            .lock()
            .expect("poisoned mutex")
            .push((url.to_string(), body.to_vec()));
        Ok(())
    }
}

pub fn context() -> InvocationContext {
    InvocationContext {
        request_id: "6c5a3f0e-8c1e-4a51-9a67-1b2f6b7e1d11".to_string(),
        log_stream_name: LOG_STREAM.to_string(),
    }
}

/// Wire-format event with the orchestrator fields filled in; `fields` are
/// merged on top.
pub fn event(fields: Value) -> CustomResourceEvent {
    let mut raw = json!({
        "ResponseURL": "https://cloudformation-custom-resource-response-euwest1.s3.amazonaws.com/presigned",
        "StackId": "arn:aws:cloudformation:eu-west-1:123456789012:stack/custom-resource-demo/1",
        "RequestId": "b3c2a1d0-0000-4000-8000-000000000001",
        "LogicalResourceId": "MyBucket",
        "ResourceType": "Custom::S3Bucket",
        "ResourceProperties": {
            "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:custom-resource-handler"
        }
    });
    let target = raw.as_object_mut().expect("object");
    for (key, value) in fields.as_object().expect("fields should be an object") {
        target.insert(key.clone(), value.clone());
    }
    serde_json::from_value(raw).expect("event should decode")
}
