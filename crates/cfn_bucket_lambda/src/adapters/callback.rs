use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("callback request failed: {0}")]
    Request(String),
    #[error("callback endpoint answered with status {status}")]
    Status { status: u16 },
}

pub trait CallbackTransport {
    /// Single PUT of `body` to the pre-signed `url`; the response body is ignored.
    fn put(&self, url: &str, body: &[u8]) -> Result<(), TransportError>;
}
