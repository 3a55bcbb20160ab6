use lambda_runtime::{tracing, Error, LambdaEvent};
use serde_json::Value;
use tokio::time::Instant;

use crate::error::LookupError;
use crate::request;
use crate::response::{Reply, Response};
use crate::store::NameStore;

/// Lambda entry point. Lookup failures are answered in-band; only a
/// response that cannot be serialized escapes as an `Err`.
pub(crate) async fn function_handler<S: NameStore>(
    store: &S,
    event: LambdaEvent<Value>,
) -> Result<Response, Error> {
    tracing::info!(request_id = %event.context.request_id, "received invocation");
    Ok(handle(store, &event.payload).await?)
}

/// Answer one payload in whichever shape its caller expects.
pub async fn handle<S: NameStore>(
    store: &S,
    payload: &Value,
) -> Result<Response, serde_json::Error> {
    let convention = request::detect(payload);
    let result = lookup(store, payload).await;

    if let Err(err) = &result {
        match err {
            LookupError::StoreUnavailable(_) => {
                tracing::error!(kind = err.kind(), ?convention, "{err}")
            }
            _ => tracing::warn!(kind = err.kind(), ?convention, "{err}"),
        }
    }

    Response::shape(convention, Reply::from(result))
}

/// Resolve a payload to the names in the requested bucket.
pub async fn lookup<S: NameStore>(store: &S, payload: &Value) -> Result<Vec<String>, LookupError> {
    let request = request::extract(payload)?.into_request()?;
    tracing::info!(state = %request.state, bucket = %request.bucket, "looking up bucket");

    let start = Instant::now();
    let record = store
        .get(&request.state)
        .await?
        .ok_or_else(|| LookupError::StateNotFound(request.state.clone()))?;
    let elapsed = start.elapsed();
    tracing::info!(
        state = %record.state_code,
        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
        "record fetched"
    );

    let names = record.into_bucket(request.bucket);
    tracing::info!(bucket = %request.bucket, names = names.len(), "bucket resolved");

    Ok(names)
}
