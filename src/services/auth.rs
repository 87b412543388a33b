// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::{
    common::error::AppError,
    db::PrincipalRepository,
    models::{
        auth::{Claims, Principal},
        tenancy::Tenant,
    },
};

/// Hashes a password on a blocking thread so bcrypt never stalls the
/// request workers.
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("hashing task failed: {e}"))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let password_hash = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password, &password_hash))
        .await
        .map_err(|e| anyhow::anyhow!("password verification task failed: {e}"))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    principal_repo: PrincipalRepository,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(principal_repo: PrincipalRepository, jwt_secret: String) -> Self {
        Self {
            principal_repo,
            jwt_secret,
        }
    }

    /// Login is tenant-scoped: the same e-mail may exist under several
    /// troops, so the credential is (tenant, email, password).
    pub async fn login(
        &self,
        tenant: &Tenant,
        email: &str,
        password: &str,
    ) -> Result<String, AppError> {
        let principal = self
            .principal_repo
            .find_by_email(tenant.id, email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &principal.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&principal)
    }

    /// Decodes a bearer token and re-validates it against the live data: a
    /// principal that has been deleted, or moved to another troop, loses
    /// access immediately even though their token has not expired.
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthenticated)?;

        let principal = self
            .principal_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if principal.tenant_id != token_data.claims.tenant_id {
            return Err(AppError::Unauthenticated);
        }

        // The row, not the token, is the source of truth for the role from
        // here on; a demoted admin is a scout on the very next request.
        Ok(principal)
    }

    pub fn create_token(&self, principal: &Principal) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: principal.id,
            tenant_id: principal.tenant_id,
            role: principal.role,
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
