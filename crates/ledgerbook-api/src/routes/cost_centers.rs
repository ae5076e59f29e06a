//! Cost center CRUD routes

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Extension, Path, State},
    http::StatusCode,
    routing::get,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use ledgerbook_data::CostCenter;
use ledgerbook_search::{Link, resource_links};

use crate::error::{ApiError, ApiResult};
use crate::middleware::{RequestContext, correlation_id};
use crate::state::AppState;
use crate::validation::require_bounded_text;

pub const RESOURCE: &str = "cost-centers";

/// Cost center representation returned by the API
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterDto {
    pub id: i32,
    pub name: String,
    /// Hypermedia links; populated on single-resource reads
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, Link>,
}

impl From<CostCenter> for CostCenterDto {
    fn from(cost_center: CostCenter) -> Self {
        Self {
            id: cost_center.id,
            name: cost_center.name,
            links: BTreeMap::new(),
        }
    }
}

impl CostCenterDto {
    fn with_links(mut self, base_url: &str) -> Self {
        self.links = resource_links(base_url, RESOURCE, self.id, true);
        self
    }
}

/// Payload for creating or updating a cost center
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CostCenterRequest {
    pub name: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cost-centers", get(list_cost_centers).post(create_cost_center))
        .route(
            "/cost-centers/{id}",
            get(get_cost_center)
                .put(update_cost_center)
                .delete(delete_cost_center),
        )
}

async fn list_cost_centers(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
) -> ApiResult<Json<Vec<CostCenterDto>>> {
    let correlation_id = correlation_id(context.as_deref());
    let cost_centers = state
        .cost_centers
        .list()
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;
    Ok(Json(
        cost_centers.into_iter().map(CostCenterDto::from).collect(),
    ))
}

async fn get_cost_center(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CostCenterDto>> {
    let correlation_id = correlation_id(context.as_deref());
    let cost_center = state
        .cost_centers
        .get(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "cost center",
            id,
            correlation_id,
        })?;
    Ok(Json(
        CostCenterDto::from(cost_center).with_links(&state.base_url),
    ))
}

async fn create_cost_center(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Json(payload): Json<CostCenterRequest>,
) -> ApiResult<(StatusCode, Json<CostCenterDto>)> {
    let correlation_id = correlation_id(context.as_deref());
    require_bounded_text(&payload.name, "name", 70, &correlation_id)?;

    let cost_center = state
        .cost_centers
        .create(payload.name.trim().to_string())
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id))?;

    Ok((
        StatusCode::CREATED,
        Json(CostCenterDto::from(cost_center).with_links(&state.base_url)),
    ))
}

async fn update_cost_center(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
    Json(payload): Json<CostCenterRequest>,
) -> ApiResult<Json<CostCenterDto>> {
    let correlation_id = correlation_id(context.as_deref());
    require_bounded_text(&payload.name, "name", 70, &correlation_id)?;

    let cost_center = state
        .cost_centers
        .update(id, payload.name.trim().to_string())
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?
        .ok_or(ApiError::NotFound {
            resource: "cost center",
            id,
            correlation_id,
        })?;

    Ok(Json(
        CostCenterDto::from(cost_center).with_links(&state.base_url),
    ))
}

async fn delete_cost_center(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    let correlation_id = correlation_id(context.as_deref());
    let deleted = state
        .cost_centers
        .delete(id)
        .await
        .map_err(|e| ApiError::from_db(e, correlation_id.clone()))?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound {
            resource: "cost center",
            id,
            correlation_id,
        })
    }
}
