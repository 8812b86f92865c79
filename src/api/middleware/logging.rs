use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Logs one line per request; client errors are raised to `warn`.
/// Server errors are already logged with their cause by `ApiError`.
pub async fn request_logger(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();

    if response.status().is_client_error() {
        warn!(%method, %path, status, duration_ms, "Request rejected");
    } else {
        info!(%method, %path, status, duration_ms, "Request completed");
    }

    response
}
