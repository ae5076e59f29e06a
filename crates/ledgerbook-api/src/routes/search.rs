//! Paginated search routes
//!
//! One endpoint per entity, all with the same contract: optional
//! entity-specific predicates plus `page`/`pageSize`/`sortBy`/`sortOrder`.
//! Pagination inputs are clamped, contradictory ranges are rejected with
//! a 400, unrecognized sort fields silently fall back to the entity
//! default, and the response is a [`PagedResult`] envelope decorated
//! with navigation links.

use axum::{
    Json, Router,
    extract::{Extension, Query, State},
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use ledgerbook_data::{
    AccountFilter, AccountKind, ClientFilter, CostCenterFilter, LedgerEntryFilter, SaleFilter,
};
use ledgerbook_search::{PagedResult, SearchRequest};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestContext, correlation_id};
use crate::routes::accounts::AccountDto;
use crate::routes::clients::ClientDto;
use crate::routes::cost_centers::CostCenterDto;
use crate::routes::ledger_entries::LedgerEntryDto;
use crate::routes::sales::SaleDto;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/search/clients", get(search_clients))
        .route("/search/accounts", get(search_accounts))
        .route("/search/cost-centers", get(search_cost_centers))
        .route("/search/ledger-entries", get(search_ledger_entries))
        .route("/search/sales", get(search_sales))
}

/// Query parameters for client searches
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ClientSearchQuery {
    /// Substring match on the client name
    pub name: Option<String>,
    /// Exact match on the tax identifier
    pub tax_id: Option<String>,
    /// Exact match on the active flag
    pub active: Option<bool>,
    /// Substring match on the email address
    pub email: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl ClientSearchQuery {
    fn into_filter(self) -> ClientFilter {
        ClientFilter {
            search: SearchRequest::new(self.page, self.page_size, self.sort_by, self.sort_order),
            name: self.name,
            tax_id: self.tax_id,
            active: self.active,
            email: self.email,
        }
    }
}

/// Query parameters for account searches
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AccountSearchQuery {
    /// Substring match on the account name
    pub name: Option<String>,
    /// Exact match on the ledger side (`debit` or `credit`)
    pub kind: Option<AccountKind>,
    /// Exact match on the owning client
    pub client_id: Option<i32>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl AccountSearchQuery {
    fn into_filter(self) -> AccountFilter {
        AccountFilter {
            search: SearchRequest::new(self.page, self.page_size, self.sort_by, self.sort_order),
            name: self.name,
            kind: self.kind,
            client_id: self.client_id,
        }
    }
}

/// Query parameters for cost center searches
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterSearchQuery {
    /// Substring match on the cost center name
    pub name: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl CostCenterSearchQuery {
    fn into_filter(self) -> CostCenterFilter {
        CostCenterFilter {
            search: SearchRequest::new(self.page, self.page_size, self.sort_by, self.sort_order),
            name: self.name,
        }
    }
}

/// Query parameters for ledger entry searches
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntrySearchQuery {
    /// Inclusive lower bound on the amount
    #[param(value_type = Option<String>)]
    pub amount_min: Option<Decimal>,
    /// Inclusive upper bound on the amount
    #[param(value_type = Option<String>)]
    pub amount_max: Option<Decimal>,
    /// Exact match on the account
    pub account_id: Option<i32>,
    /// Exact match on the cost center
    pub cost_center_id: Option<i32>,
    /// Inclusive lower bound on the creation date (RFC 3339)
    #[param(value_type = Option<String>)]
    pub created_from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation date (RFC 3339)
    #[param(value_type = Option<String>)]
    pub created_to: Option<DateTime<Utc>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl LedgerEntrySearchQuery {
    fn into_filter(self) -> LedgerEntryFilter {
        LedgerEntryFilter {
            search: SearchRequest::new(self.page, self.page_size, self.sort_by, self.sort_order),
            amount_min: self.amount_min,
            amount_max: self.amount_max,
            account_id: self.account_id,
            cost_center_id: self.cost_center_id,
            created_from: self.created_from,
            created_to: self.created_to,
        }
    }
}

/// Query parameters for sale searches
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SaleSearchQuery {
    /// Exact match on the client
    pub client_id: Option<i32>,
    /// Exact match on the ledger entry
    pub ledger_entry_id: Option<i32>,
    /// Exact match on the external sales event
    pub sale_event_id: Option<i64>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl SaleSearchQuery {
    fn into_filter(self) -> SaleFilter {
        SaleFilter {
            search: SearchRequest::new(self.page, self.page_size, self.sort_by, self.sort_order),
            client_id: self.client_id,
            ledger_entry_id: self.ledger_entry_id,
            sale_event_id: self.sale_event_id,
        }
    }
}

/// Paginated client search
#[utoipa::path(
    get,
    path = "/search/clients",
    params(ClientSearchQuery),
    responses(
        (status = 200, description = "One page of matching clients", body = PagedResult<ClientDto>),
        (status = 400, description = "Invalid filter combination"),
    ),
    tag = "search"
)]
pub async fn search_clients(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Query(query): Query<ClientSearchQuery>,
) -> ApiResult<Json<PagedResult<ClientDto>>> {
    let correlation_id = correlation_id(context.as_deref());

    let mut filter = query.into_filter();
    filter.normalize();
    filter
        .validate()
        .map_err(|e| ApiError::validation(e.to_string(), correlation_id.clone()))?;

    let (items, total) = state
        .clients
        .search_paged(&filter)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    info!(
        correlation_id = %correlation_id,
        total,
        page = filter.search.page,
        "Client search"
    );

    let mut result = PagedResult::from_request(items, &filter.search, total).map(ClientDto::from);
    result.add_links(
        &state.base_url,
        super::clients::RESOURCE,
        &filter.query_pairs(),
    );
    Ok(Json(result))
}

/// Paginated account search
#[utoipa::path(
    get,
    path = "/search/accounts",
    params(AccountSearchQuery),
    responses(
        (status = 200, description = "One page of matching accounts", body = PagedResult<AccountDto>),
        (status = 400, description = "Invalid filter combination"),
    ),
    tag = "search"
)]
pub async fn search_accounts(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Query(query): Query<AccountSearchQuery>,
) -> ApiResult<Json<PagedResult<AccountDto>>> {
    let correlation_id = correlation_id(context.as_deref());

    let mut filter = query.into_filter();
    filter.normalize();
    filter
        .validate()
        .map_err(|e| ApiError::validation(e.to_string(), correlation_id.clone()))?;

    let (items, total) = state
        .accounts
        .search_paged(&filter)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    info!(
        correlation_id = %correlation_id,
        total,
        page = filter.search.page,
        "Account search"
    );

    let mut result = PagedResult::from_request(items, &filter.search, total).map(AccountDto::from);
    result.add_links(
        &state.base_url,
        super::accounts::RESOURCE,
        &filter.query_pairs(),
    );
    Ok(Json(result))
}

/// Paginated cost center search
#[utoipa::path(
    get,
    path = "/search/cost-centers",
    params(CostCenterSearchQuery),
    responses(
        (status = 200, description = "One page of matching cost centers", body = PagedResult<CostCenterDto>),
        (status = 400, description = "Invalid filter combination"),
    ),
    tag = "search"
)]
pub async fn search_cost_centers(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Query(query): Query<CostCenterSearchQuery>,
) -> ApiResult<Json<PagedResult<CostCenterDto>>> {
    let correlation_id = correlation_id(context.as_deref());

    let mut filter = query.into_filter();
    filter.normalize();
    filter
        .validate()
        .map_err(|e| ApiError::validation(e.to_string(), correlation_id.clone()))?;

    let (items, total) = state
        .cost_centers
        .search_paged(&filter)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    info!(
        correlation_id = %correlation_id,
        total,
        page = filter.search.page,
        "Cost center search"
    );

    let mut result =
        PagedResult::from_request(items, &filter.search, total).map(CostCenterDto::from);
    result.add_links(
        &state.base_url,
        super::cost_centers::RESOURCE,
        &filter.query_pairs(),
    );
    Ok(Json(result))
}

/// Paginated ledger entry search
#[utoipa::path(
    get,
    path = "/search/ledger-entries",
    params(LedgerEntrySearchQuery),
    responses(
        (status = 200, description = "One page of matching ledger entries", body = PagedResult<LedgerEntryDto>),
        (status = 400, description = "Invalid filter combination"),
    ),
    tag = "search"
)]
pub async fn search_ledger_entries(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Query(query): Query<LedgerEntrySearchQuery>,
) -> ApiResult<Json<PagedResult<LedgerEntryDto>>> {
    let correlation_id = correlation_id(context.as_deref());

    let mut filter = query.into_filter();
    filter.normalize();
    filter
        .validate()
        .map_err(|e| ApiError::validation(e.to_string(), correlation_id.clone()))?;

    let (items, total) = state
        .ledger_entries
        .search_paged(&filter)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    info!(
        correlation_id = %correlation_id,
        total,
        page = filter.search.page,
        "Ledger entry search"
    );

    let mut result =
        PagedResult::from_request(items, &filter.search, total).map(LedgerEntryDto::from);
    result.add_links(
        &state.base_url,
        super::ledger_entries::RESOURCE,
        &filter.query_pairs(),
    );
    Ok(Json(result))
}

/// Paginated sale search
#[utoipa::path(
    get,
    path = "/search/sales",
    params(SaleSearchQuery),
    responses(
        (status = 200, description = "One page of matching sales", body = PagedResult<SaleDto>),
        (status = 400, description = "Invalid filter combination"),
    ),
    tag = "search"
)]
pub async fn search_sales(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Query(query): Query<SaleSearchQuery>,
) -> ApiResult<Json<PagedResult<SaleDto>>> {
    let correlation_id = correlation_id(context.as_deref());

    let mut filter = query.into_filter();
    filter.normalize();
    filter
        .validate()
        .map_err(|e| ApiError::validation(e.to_string(), correlation_id.clone()))?;

    let (items, total) = state
        .sales
        .search_paged(&filter)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    info!(
        correlation_id = %correlation_id,
        total,
        page = filter.search.page,
        "Sale search"
    );

    let mut result = PagedResult::from_request(items, &filter.search, total).map(SaleDto::from);
    result.add_links(
        &state.base_url,
        super::sales::RESOURCE,
        &filter.query_pairs(),
    );
    Ok(Json(result))
}
