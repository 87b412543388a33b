// src/middleware/auth.rs

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::tenancy::{TENANT_SLUG_HEADER, TenantContext},
    models::auth::Principal,
};

/// The one guard every tenant-scoped route passes through. It validates the
/// bearer token (including the liveness re-check against the principals
/// table), resolves the x-troop-slug selector, and refuses to proceed when
/// the token was minted for a different troop than the selector names.
///
/// Handlers downstream pick the results up via the `CurrentUser` and
/// `TenantContext` extractors; nothing tenant-scoped runs without both.
pub async fn tenant_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();

    let Authorization(bearer) = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthenticated)?;

    let principal = app_state.auth_service.validate_token(bearer.token()).await?;

    let slug = headers
        .get(TENANT_SLUG_HEADER)
        .ok_or(AppError::TenantSelectorMissing)?
        .to_str()
        .map_err(|_| {
            AppError::InvalidInput(format!(
                "The {TENANT_SLUG_HEADER} header contains invalid characters."
            ))
        })?;

    let tenant = app_state.tenancy_service.resolve(slug).await?;

    // A valid token for troop A is not a credential for troop B.
    if principal.tenant_id != tenant.id {
        return Err(AppError::Unauthenticated);
    }

    request.extensions_mut().insert(CurrentUser(principal));
    request.extensions_mut().insert(TenantContext(tenant));
    Ok(next.run(request).await)
}

/// The authenticated principal, re-validated against the database by
/// `tenant_guard`.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthenticated)
    }
}
