// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::TenantSelector,
    models::auth::{AuthResponse, LoginPayload},
};

// Login runs before authentication, so it takes the raw selector and
// resolves the tenant itself; the e-mail is only meaningful within a troop.
pub async fn login(
    State(app_state): State<AppState>,
    selector: TenantSelector,
    Json(payload): Json<LoginPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tenant = app_state.tenancy_service.resolve(&selector.0).await?;
    let token = app_state
        .auth_service
        .login(&tenant, &payload.email, &payload.password)
        .await?;

    Ok((StatusCode::OK, Json(AuthResponse { token })))
}
