use cfn_bucket_lambda::adapters::http::HttpCallbackTransport;
use cfn_bucket_lambda::adapters::s3::S3BucketStore;
use cfn_bucket_lambda::config::HandlerConfig;
use cfn_bucket_lambda::handlers::dispatch::dispatch_event;
use cfn_bucket_lambda::handlers::notify::InvocationContext;
use cfn_bucket_lambda::logging;
use cfn_bucket_lambda::runtime::contract::CustomResourceEvent;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

struct RuntimeDependencies {
    config: HandlerConfig,
    store: S3BucketStore,
    transport: HttpCallbackTransport,
}

async fn handle_request(
    event: LambdaEvent<Value>,
    deps: &RuntimeDependencies,
) -> Result<Value, Error> {
    let request: CustomResourceEvent = serde_json::from_value(event.payload)
        .map_err(|error| Error::from(format!("invalid custom resource event: {error}")))?;
    let context = InvocationContext {
        request_id: event.context.request_id.clone(),
        log_stream_name: event.context.env_config.log_stream.clone(),
    };

    let envelope = dispatch_event(
        &request,
        &context,
        &deps.config,
        &deps.store,
        &deps.transport,
    )?;
    serde_json::to_value(envelope)
        .map_err(|error| Error::from(format!("failed to serialize response envelope: {error}")))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init()?;

    let config = HandlerConfig::from_env()?;
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let deps = RuntimeDependencies {
        store: S3BucketStore::new(aws_sdk_s3::Client::new(&aws_config)),
        transport: HttpCallbackTransport::new(config.callback_timeout)?,
        config,
    };

    let deps = &deps;
    lambda_runtime::run(service_fn(move |event| handle_request(event, deps))).await
}
