//! REST API handlers

use axum::{
    body::Bytes,
    extract::DefaultBodyLimit,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use extender_core::{encode_priorities, ExtenderArgs, ExtenderConfig, ExtenderError};
use extender_scheduler::{PriorityFunction, PriorityRegistry};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{debug, error, info, trace, warn};

/// Create the API router, one `POST` route per registered priority
pub fn create_router(config: &ExtenderConfig, registry: Arc<PriorityRegistry>) -> Router {
    let mut router = Router::new();

    for priority in registry.iter() {
        let path = config.priority_path(priority.name());
        let priority = Arc::clone(priority);
        info!(priority = %priority.name(), path = %path, "Added priority method");

        router = router.route(
            &path,
            post(move |body: Bytes| prioritize(Arc::clone(&priority), body)),
        );
    }

    router
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
}

/// Decode the extender arguments, score the nodes and encode the result.
///
/// The work runs on the blocking pool so the request timeout can cut it short.
async fn prioritize(priority: Arc<dyn PriorityFunction>, body: Bytes) -> Response {
    let worker = Arc::clone(&priority);
    let result = tokio::task::spawn_blocking(move || try_prioritize(worker.as_ref(), &body))
        .await
        .unwrap_or_else(|e| {
            Err(ExtenderError::Priority {
                name: priority.name().to_string(),
                reason: e.to_string(),
            })
        });

    match result {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                error!(priority = %priority.name(), error = %e, "Priority request failed");
            } else {
                warn!(priority = %priority.name(), error = %e, "Rejected priority request");
            }
            (status, e.to_string()).into_response()
        }
    }
}

fn try_prioritize(priority: &dyn PriorityFunction, body: &[u8]) -> Result<Vec<u8>, ExtenderError> {
    trace!(
        priority = %priority.name(),
        args = %String::from_utf8_lossy(body),
        "Received extender args"
    );

    let args = ExtenderArgs::decode(body)?;
    let list = priority.prioritize(&args.pod, &args.nodes.items)?;
    let encoded = encode_priorities(&list)?;

    debug!(
        priority = %priority.name(),
        pod = %args.pod.name(),
        host_priority_list = %String::from_utf8_lossy(&encoded),
        "Scored nodes"
    );
    Ok(encoded)
}

/// HTTP status reported for a failed request
fn status_for(err: &ExtenderError) -> StatusCode {
    match err {
        ExtenderError::EmptyRequest | ExtenderError::Decode(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_router() {
        let registry = Arc::new(PriorityRegistry::with_defaults().unwrap());
        let _router = create_router(&ExtenderConfig::default(), registry);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(&ExtenderError::EmptyRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&ExtenderError::Decode("eof".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&ExtenderError::Encode("nan".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&ExtenderError::Priority {
                name: "image_score".to_string(),
                reason: "boom".to_string(),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
