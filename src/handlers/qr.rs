// src/handlers/qr.rs

use axum::{
    Json,
    extract::{Path, State},
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
};

/// Mints the QR payload for one item. The label-printing frontend turns
/// this JSON into an actual QR image; the core only defines the payload.
pub async fn mint(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_READ)?;

    let payload = app_state.qr_service.mint(&tenant.0, item_id).await?;
    Ok((StatusCode::OK, Json(payload)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScanPayload {
    #[validate(length(min = 1, message = "qrData is required."))]
    pub qr_data: String,
}

pub async fn scan(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Json(payload): Json<ScanPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::CIRCULATION)?;
    payload.validate()?;

    let item = app_state
        .qr_service
        .resolve(&tenant.0, &payload.qr_data)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}
