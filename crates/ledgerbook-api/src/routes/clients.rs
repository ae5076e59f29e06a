//! Client CRUD routes
//!
//! Clients carry the system's uniqueness rules: one client per tax id,
//! one per email. Both are checked up front for a friendly 409, with
//! the database's unique constraints as the concurrent-writer backstop.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ledgerbook_data::{Client, ClientUpdate, NewClient};
use ledgerbook_search::{Link, resource_links};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestContext, correlation_id};
use crate::state::AppState;
use crate::validation::{require_bounded_text, require_email};

pub const RESOURCE: &str = "clients";

/// Client representation returned by the API (the password never leaves)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: i32,
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub active: bool,
    #[schema(value_type = String)]
    pub registered_at: DateTime<Utc>,
    /// Hypermedia links; populated on single-resource reads
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            name: client.name,
            tax_id: client.tax_id,
            email: client.email,
            active: client.active,
            registered_at: client.registered_at,
            links: BTreeMap::new(),
        }
    }
}

impl ClientDto {
    fn with_links(mut self, base_url: &str) -> Self {
        self.links = resource_links(base_url, RESOURCE, self.id, true);
        self
    }
}

/// Payload for creating a client
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub password: String,
    /// Defaults to active when omitted
    #[serde(default = "default_active")]
    pub active: bool,
}

const fn default_active() -> bool {
    true
}

/// Payload for updating a client
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    pub name: String,
    pub email: String,
    pub active: bool,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).delete(delete_client),
        )
}

async fn list_clients(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
) -> ApiResult<Json<Vec<ClientDto>>> {
    let correlation_id = correlation_id(context.as_deref());
    let clients = state
        .clients
        .list()
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;
    Ok(Json(clients.into_iter().map(ClientDto::from).collect()))
}

async fn get_client(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ClientDto>> {
    let correlation_id = correlation_id(context.as_deref());
    let client = state
        .clients
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "client",
            id,
            correlation_id,
        })?;
    Ok(Json(ClientDto::from(client).with_links(&state.base_url)))
}

async fn create_client(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Json(payload): Json<CreateClientRequest>,
) -> ApiResult<(StatusCode, Json<ClientDto>)> {
    let correlation_id = correlation_id(context.as_deref());

    require_bounded_text(&payload.name, "name", 100, &correlation_id)?;
    require_bounded_text(&payload.tax_id, "taxId", 14, &correlation_id)?;
    require_email(&payload.email, "email", &correlation_id)?;
    require_bounded_text(&payload.password, "password", 100, &correlation_id)?;

    if state
        .clients
        .get_by_tax_id(payload.tax_id.trim())
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: "a client with this tax id already exists".to_string(),
            correlation_id,
        });
    }

    if state
        .clients
        .get_by_email(payload.email.trim())
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .is_some()
    {
        return Err(ApiError::Conflict {
            message: "a client with this email already exists".to_string(),
            correlation_id,
        });
    }

    let client = state
        .clients
        .create(NewClient {
            name: payload.name.trim().to_string(),
            tax_id: payload.tax_id.trim().to_string(),
            email: payload.email.trim().to_string(),
            password: payload.password,
            active: payload.active,
        })
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;

    Ok((
        StatusCode::CREATED,
        Json(ClientDto::from(client).with_links(&state.base_url)),
    ))
}

async fn update_client(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClientRequest>,
) -> ApiResult<Json<ClientDto>> {
    let correlation_id = correlation_id(context.as_deref());

    require_bounded_text(&payload.name, "name", 100, &correlation_id)?;
    require_email(&payload.email, "email", &correlation_id)?;

    // Another client may already own the new email
    if let Some(existing) = state
        .clients
        .get_by_email(payload.email.trim())
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        && existing.id != id
    {
        return Err(ApiError::Conflict {
            message: "a client with this email already exists".to_string(),
            correlation_id,
        });
    }

    let client = state
        .clients
        .update(
            id,
            ClientUpdate {
                name: payload.name.trim().to_string(),
                email: payload.email.trim().to_string(),
                active: payload.active,
            },
        )
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "client",
            id,
            correlation_id,
        })?;

    Ok(Json(ClientDto::from(client).with_links(&state.base_url)))
}

async fn delete_client(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id(context.as_deref());
    let deleted = state
        .clients
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "client",
            id,
            correlation_id,
        })
    }
}
