//! Sale CRUD routes

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ledgerbook_data::{NewSale, Sale};
use ledgerbook_search::{Link, resource_links};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestContext, correlation_id};
use crate::state::AppState;
use crate::validation::require_positive_id;

pub const RESOURCE: &str = "sales";

/// Sale representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: i32,
    pub client_id: i32,
    pub ledger_entry_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_event_id: Option<i64>,
    /// Hypermedia links; populated on single-resource reads
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl From<Sale> for SaleDto {
    fn from(sale: Sale) -> Self {
        Self {
            id: sale.id,
            client_id: sale.client_id,
            ledger_entry_id: sale.ledger_entry_id,
            sale_event_id: sale.sale_event_id,
            links: BTreeMap::new(),
        }
    }
}

impl SaleDto {
    fn with_links(mut self, base_url: &str) -> Self {
        self.links = resource_links(base_url, RESOURCE, self.id, true);
        self
    }
}

/// Payload for creating or updating a sale
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleRequest {
    pub client_id: i32,
    pub ledger_entry_id: i32,
    pub sale_event_id: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/sales", get(list_sales).post(create_sale))
        .route(
            "/sales/{id}",
            get(get_sale).put(update_sale).delete(delete_sale),
        )
}

fn validate_payload(
    payload: &SaleRequest,
    correlation_id: &ledgerbook_common::CorrelationId,
) -> ApiResult<()> {
    require_positive_id(payload.client_id, "clientId", correlation_id)?;
    require_positive_id(payload.ledger_entry_id, "ledgerEntryId", correlation_id)?;
    Ok(())
}

async fn list_sales(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
) -> ApiResult<Json<Vec<SaleDto>>> {
    let correlation_id = correlation_id(context.as_deref());
    let sales = state
        .sales
        .list()
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;
    Ok(Json(sales.into_iter().map(SaleDto::from).collect()))
}

async fn get_sale(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<SaleDto>> {
    let correlation_id = correlation_id(context.as_deref());
    let sale = state
        .sales
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "sale",
            id,
            correlation_id,
        })?;
    Ok(Json(SaleDto::from(sale).with_links(&state.base_url)))
}

async fn create_sale(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Json(payload): Json<SaleRequest>,
) -> ApiResult<(StatusCode, Json<SaleDto>)> {
    let correlation_id = correlation_id(context.as_deref());
    validate_payload(&payload, &correlation_id)?;

    let sale = state
        .sales
        .create(NewSale {
            client_id: payload.client_id,
            ledger_entry_id: payload.ledger_entry_id,
            sale_event_id: payload.sale_event_id,
        })
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;

    Ok((
        StatusCode::CREATED,
        Json(SaleDto::from(sale).with_links(&state.base_url)),
    ))
}

async fn update_sale(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
    Json(payload): Json<SaleRequest>,
) -> ApiResult<Json<SaleDto>> {
    let correlation_id = correlation_id(context.as_deref());
    validate_payload(&payload, &correlation_id)?;

    let sale = state
        .sales
        .update(
            id,
            NewSale {
                client_id: payload.client_id,
                ledger_entry_id: payload.ledger_entry_id,
                sale_event_id: payload.sale_event_id,
            },
        )
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "sale",
            id,
            correlation_id,
        })?;

    Ok(Json(SaleDto::from(sale).with_links(&state.base_url)))
}

async fn delete_sale(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id(context.as_deref());
    let deleted = state
        .sales
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "sale",
            id,
            correlation_id,
        })
    }
}
