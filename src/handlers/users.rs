// src/handlers/users.rs

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
    models::auth::Role,
};

pub async fn list_users(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::USER_LIST)?;

    let principals = app_state.user_service.list(tenant.0.id).await?;
    Ok((StatusCode::OK, Json(principals)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[validate(length(min = 1, message = "Username is required."))]
    pub username: String,

    #[validate(email(message = "A valid e-mail address is required."))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters."))]
    pub password: String,

    pub role: Role,
}

pub async fn create_user(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::USER_ADMIN)?;
    payload.validate()?;

    let principal = app_state
        .user_service
        .create(
            tenant.0.id,
            &payload.username,
            &payload.email,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(principal)))
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[validate(length(min = 1, message = "Username must not be empty."))]
    pub username: Option<String>,

    #[validate(email(message = "A valid e-mail address is required."))]
    pub email: Option<String>,

    pub role: Option<Role>,
}

pub async fn update_user(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::USER_ADMIN)?;
    payload.validate()?;

    let principal = app_state
        .user_service
        .update(
            tenant.0.id,
            &user.0,
            id,
            payload.username,
            payload.email,
            payload.role,
        )
        .await?;

    Ok((StatusCode::OK, Json(principal)))
}

pub async fn delete_user(
    State(app_state): State<AppState>,
    user: CurrentUser,
    tenant: TenantContext,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    rbac::authorize(user.0.role, rbac::USER_ADMIN)?;

    app_state.user_service.delete(tenant.0.id, &user.0, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[validate(length(min = 1, message = "Current password is required."))]
    pub current_password: String,

    #[validate(length(min = 6, message = "New password must be at least 6 characters."))]
    pub new_password: String,
}

// No role gate here: changing your own password is always allowed.
pub async fn change_my_password(
    State(app_state): State<AppState>,
    user: CurrentUser,
    _tenant: TenantContext,
    Json(payload): Json<ChangePasswordPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state
        .user_service
        .change_password(&user.0, &payload.current_password, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
