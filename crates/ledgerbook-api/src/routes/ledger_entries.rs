//! Ledger entry CRUD routes
//!
//! Amounts are bounded to the NUMERIC(9,2) window and must reference an
//! existing account and cost center; dangling references surface as
//! validation errors via the database's foreign keys.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ledgerbook_data::{LedgerEntry, LedgerEntryUpdate, NewLedgerEntry};
use ledgerbook_search::{Link, resource_links};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestContext, correlation_id};
use crate::state::AppState;
use crate::validation::{require_amount_in_range, require_positive_id};

pub const RESOURCE: &str = "ledger-entries";

/// Ledger entry representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryDto {
    pub id: i32,
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub account_id: i32,
    pub cost_center_id: i32,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Hypermedia links; populated on single-resource reads
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl From<LedgerEntry> for LedgerEntryDto {
    fn from(entry: LedgerEntry) -> Self {
        Self {
            id: entry.id,
            amount: entry.amount,
            account_id: entry.account_id,
            cost_center_id: entry.cost_center_id,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
            links: BTreeMap::new(),
        }
    }
}

impl LedgerEntryDto {
    fn with_links(mut self, base_url: &str) -> Self {
        self.links = resource_links(base_url, RESOURCE, self.id, true);
        self
    }
}

/// Payload for creating or updating a ledger entry
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryRequest {
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub account_id: i32,
    pub cost_center_id: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ledger-entries", get(list_entries).post(create_entry))
        .route(
            "/ledger-entries/{id}",
            get(get_entry).put(update_entry).delete(delete_entry),
        )
}

fn validate_payload(
    payload: &LedgerEntryRequest,
    correlation_id: &ledgerbook_common::CorrelationId,
) -> ApiResult<()> {
    require_amount_in_range(payload.amount, "amount", correlation_id)?;
    require_positive_id(payload.account_id, "accountId", correlation_id)?;
    require_positive_id(payload.cost_center_id, "costCenterId", correlation_id)?;
    Ok(())
}

async fn list_entries(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
) -> ApiResult<Json<Vec<LedgerEntryDto>>> {
    let correlation_id = correlation_id(context.as_deref());
    let entries = state
        .ledger_entries
        .list()
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;
    Ok(Json(entries.into_iter().map(LedgerEntryDto::from).collect()))
}

async fn get_entry(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<LedgerEntryDto>> {
    let correlation_id = correlation_id(context.as_deref());
    let entry = state
        .ledger_entries
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "ledger entry",
            id,
            correlation_id,
        })?;
    Ok(Json(LedgerEntryDto::from(entry).with_links(&state.base_url)))
}

async fn create_entry(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Json(payload): Json<LedgerEntryRequest>,
) -> ApiResult<(StatusCode, Json<LedgerEntryDto>)> {
    let correlation_id = correlation_id(context.as_deref());
    validate_payload(&payload, &correlation_id)?;

    let entry = state
        .ledger_entries
        .create(NewLedgerEntry {
            amount: payload.amount,
            account_id: payload.account_id,
            cost_center_id: payload.cost_center_id,
        })
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;

    Ok((
        StatusCode::CREATED,
        Json(LedgerEntryDto::from(entry).with_links(&state.base_url)),
    ))
}

async fn update_entry(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
    Json(payload): Json<LedgerEntryRequest>,
) -> ApiResult<Json<LedgerEntryDto>> {
    let correlation_id = correlation_id(context.as_deref());
    validate_payload(&payload, &correlation_id)?;

    let entry = state
        .ledger_entries
        .update(
            id,
            LedgerEntryUpdate {
                amount: payload.amount,
                account_id: payload.account_id,
                cost_center_id: payload.cost_center_id,
            },
        )
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "ledger entry",
            id,
            correlation_id,
        })?;

    Ok(Json(LedgerEntryDto::from(entry).with_links(&state.base_url)))
}

async fn delete_entry(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id(context.as_deref());
    let deleted = state
        .ledger_entries
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "ledger entry",
            id,
            correlation_id,
        })
    }
}
