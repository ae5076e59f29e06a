//! `OpenAPI` documentation generation

use axum::{Json, Router, response::IntoResponse, routing::get};
use utoipa::OpenApi;

use crate::state::AppState;

/// `OpenAPI` documentation for the Ledgerbook API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::search::search_clients,
        crate::routes::search::search_accounts,
        crate::routes::search::search_cost_centers,
        crate::routes::search::search_ledger_entries,
        crate::routes::search::search_sales,
    ),
    components(
        schemas(
            crate::routes::clients::ClientDto,
            crate::routes::accounts::AccountDto,
            crate::routes::cost_centers::CostCenterDto,
            crate::routes::ledger_entries::LedgerEntryDto,
            crate::routes::sales::SaleDto,
        )
    ),
    tags(
        (name = "search", description = "Paginated search over accounting records"),
    ),
    info(
        title = "Ledgerbook API",
        version = "0.1.0",
        description = "Accounting records management service",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;

/// Router exposing the `OpenAPI` document
pub fn routes() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// Returns `OpenAPI` JSON as a response
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
