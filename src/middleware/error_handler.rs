use axum::{
    body::{Body, to_bytes},
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

const MAX_LOGGED_BODY: usize = 4096;

/// Logs failed responses with the request line. Server error bodies are
/// buffered so their message ends up in the log as well.
pub async fn log_errors(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let response = next.run(req).await;
    let status = response.status();

    if status.is_client_error() {
        warn!("{} {} -> {}", method, uri, status);
        return response;
    }
    if !status.is_server_error() {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("{} {} -> {} (body unreadable: {})", method, uri, status, e);
            return Response::from_parts(parts, Body::empty());
        }
    };
    error!(
        "{} {} -> {}: {}",
        method,
        uri,
        status,
        String::from_utf8_lossy(&bytes)
    );

    parts.headers.remove(header::CONTENT_LENGTH);
    Response::from_parts(parts, Body::from(bytes))
}
