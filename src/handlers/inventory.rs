// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::CurrentUser, rbac, tenancy::TenantContext},
    models::inventory::{Category, ItemFilter, ItemStatus, ShelfLocation},
    services::inventory_service::ItemPatch,
};

fn parse_location(raw: &str) -> Result<ShelfLocation, AppError> {
    raw.parse::<ShelfLocation>().map_err(AppError::InvalidInput)
}

// ---
// Payload: CreateItem
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    pub description: Option<String>,
    pub category: Category,

    /// Shelf position as "side-level", e.g. "left-high".
    #[validate(length(min = 1, message = "Location is required."))]
    pub location: String,
}

pub async fn create_item(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Json(payload): Json<CreateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_WRITE)?;
    payload.validate()?;
    let location = parse_location(&payload.location)?;

    let item = app_state
        .inventory_service
        .create_item(
            tenant.0.id,
            &payload.name,
            payload.description.as_deref(),
            payload.category,
            location,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

// ---
// Query: list filters, all optional, ANDed
// ---
#[derive(Debug, Deserialize)]
pub struct ListItemsQuery {
    pub category: Option<Category>,
    pub status: Option<ItemStatus>,
    pub location: Option<String>,
    pub q: Option<String>,
}

pub async fn list_items(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Query(query): Query<ListItemsQuery>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_READ)?;

    let filter = ItemFilter {
        category: query.category,
        status: query.status,
        location: query.location.as_deref().map(parse_location).transpose()?,
        search: query.q,
    };

    let items = app_state
        .inventory_service
        .list_items(tenant.0.id, &filter)
        .await?;

    Ok((StatusCode::OK, Json(items)))
}

pub async fn get_item(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_READ)?;

    let item = app_state.inventory_service.get_item(tenant.0.id, id).await?;
    Ok((StatusCode::OK, Json(item)))
}

// ---
// Payload: UpdateItem. Absent fields keep their current value; status only
// accepts the repair-flagging moves (never checked_out).
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItemPayload {
    #[validate(length(min = 1, message = "Name must not be empty."))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub status: Option<ItemStatus>,
}

pub async fn update_item(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_WRITE)?;
    payload.validate()?;

    let patch = ItemPatch {
        name: payload.name,
        description: payload.description,
        category: payload.category,
        location: payload.location.as_deref().map(parse_location).transpose()?,
        status: payload.status,
    };

    let item = app_state
        .inventory_service
        .update_item(tenant.0.id, id, patch)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

pub async fn delete_item(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_DELETE)?;

    app_state
        .inventory_service
        .delete_item(tenant.0.id, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
