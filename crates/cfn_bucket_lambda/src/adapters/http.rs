use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::adapters::callback::{CallbackTransport, TransportError};

pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(10);

/// Delivers responses to the pre-signed S3 URL CloudFormation hands out.
#[derive(Debug, Clone)]
pub struct HttpCallbackTransport {
    client: Client,
}

impl HttpCallbackTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                TransportError::Request(format!("failed to build callback client: {error}"))
            })?;
        Ok(Self { client })
    }
}

impl CallbackTransport for HttpCallbackTransport {
    fn put(&self, url: &str, body: &[u8]) -> Result<(), TransportError> {
        let target_url = url.to_string();
        let body_bytes = body.to_vec();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                // The pre-signed URL is signed without a content type.
                let response = client
                    .put(target_url)
                    .header(CONTENT_TYPE, "")
                    .body(body_bytes)
                    .send()
                    .await
                    .map_err(|error| TransportError::Request(error.to_string()))?;

                let status = response.status();
                if status.is_success() {
                    Ok(())
                } else {
                    Err(TransportError::Status {
                        status: status.as_u16(),
                    })
                }
            })
        })
    }
}
