//! Account CRUD routes

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ledgerbook_data::{Account, AccountKind, AccountUpdate, NewAccount};
use ledgerbook_search::{Link, resource_links};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestContext, correlation_id};
use crate::state::AppState;
use crate::validation::{require_bounded_text, require_positive_id};

pub const RESOURCE: &str = "accounts";

/// Account representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: i32,
    pub name: String,
    pub kind: AccountKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<i32>,
    /// Hypermedia links; populated on single-resource reads
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl From<Account> for AccountDto {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            kind: account.kind,
            client_id: account.client_id,
            links: BTreeMap::new(),
        }
    }
}

impl AccountDto {
    fn with_links(mut self, base_url: &str) -> Self {
        self.links = resource_links(base_url, RESOURCE, self.id, true);
        self
    }
}

/// Payload for creating or updating an account
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub name: String,
    pub kind: AccountKind,
    pub client_id: Option<i32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route(
            "/accounts/{id}",
            get(get_account).put(update_account).delete(delete_account),
        )
}

fn validate_payload(
    payload: &AccountRequest,
    correlation_id: &ledgerbook_common::CorrelationId,
) -> ApiResult<()> {
    require_bounded_text(&payload.name, "name", 70, correlation_id)?;
    if let Some(client_id) = payload.client_id {
        require_positive_id(client_id, "clientId", correlation_id)?;
    }
    Ok(())
}

async fn list_accounts(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
) -> ApiResult<Json<Vec<AccountDto>>> {
    let correlation_id = correlation_id(context.as_deref());
    let accounts = state
        .accounts
        .list()
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;
    Ok(Json(accounts.into_iter().map(AccountDto::from).collect()))
}

async fn get_account(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<AccountDto>> {
    let correlation_id = correlation_id(context.as_deref());
    let account = state
        .accounts
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "account",
            id,
            correlation_id,
        })?;
    Ok(Json(AccountDto::from(account).with_links(&state.base_url)))
}

async fn create_account(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountDto>)> {
    let correlation_id = correlation_id(context.as_deref());
    validate_payload(&payload, &correlation_id)?;

    if state
        .accounts
        .exists_by_name(payload.name.trim(), None)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
    {
        return Err(ApiError::Conflict {
            message: "an account with this name already exists".to_string(),
            correlation_id,
        });
    }

    let account = state
        .accounts
        .create(NewAccount {
            name: payload.name.trim().to_string(),
            kind: payload.kind,
            client_id: payload.client_id,
        })
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;

    Ok((
        StatusCode::CREATED,
        Json(AccountDto::from(account).with_links(&state.base_url)),
    ))
}

async fn update_account(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
    Json(payload): Json<AccountRequest>,
) -> ApiResult<Json<AccountDto>> {
    let correlation_id = correlation_id(context.as_deref());
    validate_payload(&payload, &correlation_id)?;

    if state
        .accounts
        .exists_by_name(payload.name.trim(), Some(id))
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
    {
        return Err(ApiError::Conflict {
            message: "an account with this name already exists".to_string(),
            correlation_id,
        });
    }

    let account = state
        .accounts
        .update(
            id,
            AccountUpdate {
                name: payload.name.trim().to_string(),
                kind: payload.kind,
                client_id: payload.client_id,
            },
        )
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "account",
            id,
            correlation_id,
        })?;

    Ok(Json(AccountDto::from(account).with_links(&state.base_url)))
}

async fn delete_account(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id(context.as_deref());
    let deleted = state
        .accounts
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "account",
            id,
            correlation_id,
        })
    }
}
