use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, Level};

/// Request logging middleware
pub async fn request_logging(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().clone();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    info!(
        method = %method,
        uri = %uri,
        user_agent = %user_agent,
        "Request started"
    );

    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis();
    let status = response.status();

    match level_for(status) {
        Level::ERROR => tracing::error!(
            method = %method, uri = %uri, status = %status, duration_ms = %duration_ms,
            "Request completed"
        ),
        Level::WARN => tracing::warn!(
            method = %method, uri = %uri, status = %status, duration_ms = %duration_ms,
            "Request completed"
        ),
        _ => tracing::info!(
            method = %method, uri = %uri, status = %status, duration_ms = %duration_ms,
            "Request completed"
        ),
    }

    response
}

fn level_for(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}
