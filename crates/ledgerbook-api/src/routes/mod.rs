pub mod accounts;
pub mod clients;
pub mod cost_centers;
pub mod health;
pub mod ledger_entries;
pub mod sales;
pub mod search;

use axum::{Router, middleware};

use crate::state::AppState;

/// Assemble the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(clients::routes())
        .merge(accounts::routes())
        .merge(cost_centers::routes())
        .merge(ledger_entries::routes())
        .merge(sales::routes())
        .merge(search::routes())
        .merge(crate::openapi::routes())
        // Add correlation ID middleware to all routes
        .layer(middleware::from_fn(
            crate::middleware::correlation_id_middleware,
        ))
        .with_state(state)
}
