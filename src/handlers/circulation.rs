// src/handlers/circulation.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::CurrentUser, rbac, tenancy::TenantContext},
    services::circulation_service::CheckoutRequest,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    #[validate(length(min = 1, message = "checkedOutBy is required."))]
    pub checked_out_by: String,

    /// Account of the borrower, when they have one. Omitted for walk-ups.
    pub principal_id: Option<Uuid>,

    pub expected_return_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

pub async fn checkout(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::CIRCULATION)?;
    payload.validate()?;

    let item = app_state
        .circulation_service
        .checkout(
            tenant.0.id,
            item_id,
            CheckoutRequest {
                checked_out_by: payload.checked_out_by,
                principal_id: payload.principal_id,
                expected_return_at: payload.expected_return_at,
                notes: payload.notes,
            },
        )
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinPayload {
    pub notes: Option<String>,
}

pub async fn checkin(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<CheckinPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::CIRCULATION)?;

    let item = app_state
        .circulation_service
        .checkin(tenant.0.id, item_id, user.0.id, payload.notes.as_deref())
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

pub async fn history(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::ITEM_READ)?;

    let entries = app_state
        .circulation_service
        .history(tenant.0.id, item_id)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}
