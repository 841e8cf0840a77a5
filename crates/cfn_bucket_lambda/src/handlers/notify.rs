//! Completion notice for CloudFormation.
//!
//! Every invocation must end with exactly one response PUT to the event's
//! `ResponseURL`; otherwise the stack operation hangs until CloudFormation's
//! own timeout expires. Delivery is attempted once and never retried.

use thiserror::Error;
use tracing::info;

use crate::adapters::callback::{CallbackTransport, TransportError};
use crate::logging::COMPONENT;
use crate::runtime::contract::{
    CustomResourceEvent, ResponseData, ResponseEnvelope, ResponseStatus, DEFAULT_FAILURE_REASON,
};

/// The parts of the Lambda invocation context the response needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationContext {
    pub request_id: String,
    pub log_stream_name: String,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to serialize response envelope: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Builds the response envelope and PUTs it to `event.response_url`.
///
/// `reason` defaults to a pointer at the function's logs and the physical id
/// to the invocation's log stream name.
pub fn send_response(
    event: &CustomResourceEvent,
    context: &InvocationContext,
    status: ResponseStatus,
    reason: Option<&str>,
    data: ResponseData,
    physical_resource_id: Option<&str>,
    transport: &impl CallbackTransport,
) -> Result<ResponseEnvelope, NotifyError> {
    let envelope = ResponseEnvelope::for_event(
        event,
        status,
        reason.unwrap_or(DEFAULT_FAILURE_REASON),
        physical_resource_id.unwrap_or(context.log_stream_name.as_str()),
        data,
    );
    let body = serde_json::to_vec(&envelope)?;

    transport.put(&event.response_url, &body)?;
    info!(
        component = COMPONENT,
        event = "response_sent",
        request_id = %event.request_id,
        logical_resource_id = %event.logical_resource_id,
        status = ?envelope.status,
        physical_resource_id = %envelope.physical_resource_id,
    );
    Ok(envelope)
}
