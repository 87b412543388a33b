// src/handlers/tenancy.rs

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::{common::error::AppError, config::AppState};

// Tenant creation is not a tenant-scoped operation, so it cannot ride the
// normal JWT path; it is guarded by a deployment-level shared secret.
const BOOTSTRAP_TOKEN_HEADER: &str = "x-bootstrap-token";

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapTenantPayload {
    #[validate(length(min = 1, message = "Name is required."))]
    pub name: String,

    #[validate(length(min = 1, message = "Slug is required."))]
    pub slug: String,

    #[validate(length(min = 1, message = "Admin username is required."))]
    pub admin_username: String,

    #[validate(email(message = "A valid admin e-mail address is required."))]
    pub admin_email: String,

    #[validate(length(min = 6, message = "Admin password must be at least 6 characters."))]
    pub admin_password: String,
}

pub async fn bootstrap_tenant(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<BootstrapTenantPayload>,
) -> Result<impl IntoResponse, AppError> {
    let provided = headers
        .get(BOOTSTRAP_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;
    if provided != app_state.bootstrap_token {
        return Err(AppError::Unauthenticated);
    }

    payload.validate()?;

    let (tenant, admin) = app_state
        .tenancy_service
        .bootstrap(
            &payload.name,
            &payload.slug,
            &payload.admin_username,
            &payload.admin_email,
            &payload.admin_password,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "tenant": tenant, "admin": admin })),
    ))
}
