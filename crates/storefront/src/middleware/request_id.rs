//! Request correlation IDs.
//!
//! The gateway usually assigns an `x-request-id` before forwarding. That value
//! ends up in log spans, Sentry tags and the response, so it is only reused
//! when it looks like an ID; anything else is replaced with a fresh UUID v4.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest forwarded ID that is kept.
const MAX_REQUEST_ID_LEN: usize = 64;

/// Whether a forwarded ID is short and made of token characters only.
fn is_acceptable(id: &str) -> bool {
    !id.is_empty()
        && id.len() <= MAX_REQUEST_ID_LEN
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
}

/// Pick the ID for this request: the gateway's if acceptable, else a new one.
fn resolve(forwarded: Option<&HeaderValue>) -> String {
    match forwarded.map(HeaderValue::to_str) {
        Some(Ok(id)) if is_acceptable(id) => id.to_owned(),
        Some(_) => {
            tracing::debug!("Discarding malformed forwarded request id");
            Uuid::new_v4().to_string()
        }
        None => Uuid::new_v4().to_string(),
    }
}

/// Tag the request with an ID in the span, the Sentry scope and the response.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve(request.headers().get(REQUEST_ID_HEADER));

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;

    // Always valid: either vetted token characters or a UUID
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
