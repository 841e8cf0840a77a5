//! Entry point for one custom-resource invocation.
//!
//! The request type selects a lifecycle handler; whatever the handler returns
//! is turned into exactly one SUCCESS or FAILED response. A handler failure is
//! still returned to the caller after the response went out, so the Lambda
//! invocation itself shows up as failed in the platform's logs and metrics.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::adapters::bucket_store::BucketStore;
use crate::adapters::callback::CallbackTransport;
use crate::config::HandlerConfig;
use crate::handlers::lifecycle::{handle_lifecycle_request, HandlerOutput, LifecycleError};
use crate::handlers::notify::{send_response, InvocationContext, NotifyError};
use crate::logging::COMPONENT;
use crate::runtime::contract::{CustomResourceEvent, ResponseData, ResponseEnvelope, ResponseStatus};

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error("failed to deliver {status:?} response: {source}")]
    Notify {
        status: ResponseStatus,
        /// Handler failure already reported in the undelivered response.
        handler_failure: Option<String>,
        #[source]
        source: NotifyError,
    },
}

pub fn dispatch_event(
    event: &CustomResourceEvent,
    context: &InvocationContext,
    config: &HandlerConfig,
    store: &impl BucketStore,
    transport: &impl CallbackTransport,
) -> Result<ResponseEnvelope, DispatchError> {
    dispatch_event_with_rng(
        event,
        context,
        config,
        store,
        transport,
        &mut rand::thread_rng(),
    )
}

pub fn dispatch_event_with_rng(
    event: &CustomResourceEvent,
    context: &InvocationContext,
    config: &HandlerConfig,
    store: &impl BucketStore,
    transport: &impl CallbackTransport,
    rng: &mut impl Rng,
) -> Result<ResponseEnvelope, DispatchError> {
    info!(
        component = COMPONENT,
        event = "request_received",
        request_type = event.request_type.as_deref().unwrap_or_default(),
        request_id = %event.request_id,
        invocation_id = %context.request_id,
        logical_resource_id = %event.logical_resource_id,
        physical_resource_id = event.physical_resource_id().unwrap_or_default(),
    );
    debug!(component = COMPONENT, event = "request_payload", payload = ?event);

    let outcome = event
        .request_type()
        .map_err(LifecycleError::from)
        .and_then(|request_type| handle_lifecycle_request(request_type, event, config, store, rng));

    match outcome {
        Ok(HandlerOutput {
            physical_resource_id,
            data,
        }) => {
            info!(
                component = COMPONENT,
                event = "handler_succeeded",
                request_id = %event.request_id,
                physical_resource_id = physical_resource_id.as_deref().unwrap_or_default(),
            );
            send_response(
                event,
                context,
                ResponseStatus::Success,
                None,
                data,
                physical_resource_id.as_deref(),
                transport,
            )
            .map_err(|source| DispatchError::Notify {
                status: ResponseStatus::Success,
                handler_failure: None,
                source,
            })
        }
        Err(failure) => {
            let reason = failure.to_string();
            error!(
                component = COMPONENT,
                event = "handler_failed",
                request_id = %event.request_id,
                logical_resource_id = %event.logical_resource_id,
                error = %reason,
            );
            if let Err(source) = send_response(
                event,
                context,
                ResponseStatus::Failed,
                Some(&reason),
                ResponseData::new(),
                event.physical_resource_id(),
                transport,
            ) {
                return Err(DispatchError::Notify {
                    status: ResponseStatus::Failed,
                    handler_failure: Some(reason),
                    source,
                });
            }
            Err(failure.into())
        }
    }
}
