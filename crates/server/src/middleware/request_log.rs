//! # Request Logging Middleware
//!
//! Tags every request with a request id, runs it inside a tracing span and
//! logs the outcome.

use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use logging::{REQUEST_ID_HEADER, RequestId, log_api_request};
use tracing::Instrument;

/// Reuses a well-formed incoming `x-request-id` or generates a new one, and
/// echoes it on the response.
pub async fn request_log_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_header_or_new(
        request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok()),
    );
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    request.extensions_mut().insert(request_id.clone());

    let span = tracing::info_span!("request", request_id = %request_id, method = %method, path = %path);
    let started = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    let _entered = span.enter();
    log_api_request!(
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    response
}
