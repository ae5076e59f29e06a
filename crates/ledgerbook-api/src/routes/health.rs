use axum::{Extension, Json, Router, routing::get};
use serde_json::json;
use tracing::info;

use crate::middleware::RequestContext;
use crate::state::AppState;
use ledgerbook_common::CorrelationId;

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check endpoint with correlation ID tracking
async fn health_check(context: Option<Extension<RequestContext>>) -> Json<serde_json::Value> {
    let correlation_id = context
        .as_ref()
        .map_or_else(CorrelationId::new, |ctx| ctx.correlation_id.clone());

    info!(
        correlation_id = %correlation_id,
        "Health check request"
    );

    Json(json!({
        "status": "healthy",
        "service": "ledgerbook-api",
        "correlation_id": correlation_id.to_string()
    }))
}
