//! Request middleware
//!
//! Attaches a correlation ID to every request: incoming
//! `X-Correlation-ID` headers are honored (when they parse as UUIDs),
//! otherwise a fresh one is generated. The ID rides along as a request
//! extension and is echoed back on the response.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use ledgerbook_common::CorrelationId;

/// Per-request context available to handlers via `Extension`
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub correlation_id: CorrelationId,
}

/// Correlation ID middleware applied to all routes
pub async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = request
        .headers()
        .get("X-Correlation-ID")
        .and_then(|value| value.to_str().ok())
        .map_or_else(CorrelationId::new, CorrelationId::from);

    request.extensions_mut().insert(RequestContext {
        correlation_id: correlation_id.clone(),
    });

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&correlation_id.to_string()) {
        response.headers_mut().insert("X-Correlation-ID", header_value);
    }

    response
}

/// Correlation ID for a handler, from context when present
pub fn correlation_id(context: Option<&RequestContext>) -> CorrelationId {
    context.map_or_else(CorrelationId::new, |ctx| ctx.correlation_id.clone())
}
