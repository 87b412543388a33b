// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::auth::Role;

// The whole error taxonomy of the service. Every variant maps to a stable
// machine-readable `error` kind plus a human-readable `message`, so callers
// can branch without parsing prose.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Authentication required.")]
    Unauthenticated,

    #[error("Invalid e-mail or password.")]
    InvalidCredentials,

    #[error("This operation is not permitted for your role.")]
    Forbidden {
        required: &'static [Role],
        actual: Role,
    },

    #[error("The x-troop-slug header is required.")]
    TenantSelectorMissing,

    #[error("No troop matches the given selector.")]
    TenantNotFound,

    #[error("Resource not found.")]
    NotFound,

    #[error("One or more fields are invalid.")]
    Validation(#[from] validator::ValidationErrors),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    InvalidTransition(String),

    #[error("The QR payload was minted by another troop.")]
    TenantMismatch,

    #[error("The QR payload could not be decoded.")]
    MalformedPayload,

    #[error("{0}")]
    Conflict(String),

    // Everything below surfaces as a generic 500; the detailed cause only
    // goes to the log.
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),

    #[error("Bcrypt error: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } | AppError::TenantMismatch => StatusCode::FORBIDDEN,
            AppError::TenantSelectorMissing
            | AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::MalformedPayload => StatusCode::BAD_REQUEST,
            AppError::TenantNotFound | AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::InvalidTransition(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Unauthenticated | AppError::InvalidCredentials => "unauthenticated",
            AppError::Forbidden { .. } => "forbidden",
            AppError::TenantSelectorMissing => "tenant_selector_missing",
            AppError::TenantNotFound => "tenant_not_found",
            AppError::NotFound => "not_found",
            AppError::Validation(_) | AppError::InvalidInput(_) => "validation_failed",
            AppError::InvalidTransition(_) => "invalid_transition",
            AppError::TenantMismatch => "tenant_mismatch",
            AppError::MalformedPayload => "malformed_payload",
            AppError::Conflict(_) => "conflict",
            _ => "internal",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();

        let body = match &self {
            // Full field-by-field detail, same shape the validator gives us.
            AppError::Validation(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": kind,
                    "message": self.to_string(),
                    "details": details,
                })
            }
            // The caller gets to see which roles would have been enough.
            AppError::Forbidden { required, actual } => json!({
                "error": kind,
                "message": self.to_string(),
                "requiredRoles": required.iter().map(Role::as_str).collect::<Vec<_>>(),
                "actualRole": actual.as_str(),
            }),
            e if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("internal server error: {e}");
                json!({
                    "error": kind,
                    "message": "An unexpected error occurred.",
                })
            }
            _ => json!({
                "error": kind,
                "message": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}
