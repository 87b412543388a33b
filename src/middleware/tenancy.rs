// src/middleware/tenancy.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{common::error::AppError, models::tenancy::Tenant};

// The custom header carrying the tenant selector.
pub const TENANT_SLUG_HEADER: &str = "x-troop-slug";

/// The raw selector string from the x-troop-slug header. Used on routes that
/// run before authentication (login); everything else goes through
/// `tenant_guard` and gets a resolved `TenantContext` instead.
#[derive(Debug, Clone)]
pub struct TenantSelector(pub String);

impl<S> FromRequestParts<S> for TenantSelector
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(TENANT_SLUG_HEADER)
            .ok_or(AppError::TenantSelectorMissing)?;

        let slug = value.to_str().map_err(|_| {
            AppError::InvalidInput(format!(
                "The {TENANT_SLUG_HEADER} header contains invalid characters."
            ))
        })?;

        Ok(TenantSelector(slug.to_string()))
    }
}

/// The tenant a request is acting on, resolved by `tenant_guard` and stashed
/// in the request extensions. Handlers never see a raw slug.
#[derive(Debug, Clone)]
pub struct TenantContext(pub Tenant);

impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TenantContext>()
            .cloned()
            .ok_or(AppError::TenantSelectorMissing)
    }
}
