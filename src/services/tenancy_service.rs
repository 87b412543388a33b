// src/services/tenancy_service.rs

use sqlx::SqlitePool;

use crate::{
    common::error::AppError,
    db::{PrincipalRepository, TenantRepository},
    models::{
        auth::{Principal, Role},
        tenancy::Tenant,
    },
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct TenancyService {
    pool: SqlitePool,
    tenant_repo: TenantRepository,
    principal_repo: PrincipalRepository,
}

impl TenancyService {
    pub fn new(
        pool: SqlitePool,
        tenant_repo: TenantRepository,
        principal_repo: PrincipalRepository,
    ) -> Self {
        Self {
            pool,
            tenant_repo,
            principal_repo,
        }
    }

    /// The tenant resolver: selector slug in, tenant record out.
    pub async fn resolve(&self, slug: &str) -> Result<Tenant, AppError> {
        self.tenant_repo
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::TenantNotFound)
    }

    /// Privileged bootstrap: creates the troop together with its first
    /// admin in one transaction, so a tenant can never exist without
    /// someone able to administer it.
    pub async fn bootstrap(
        &self,
        name: &str,
        slug: &str,
        admin_username: &str,
        admin_email: &str,
        admin_password: &str,
    ) -> Result<(Tenant, Principal), AppError> {
        if slug.is_empty()
            || !slug
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(AppError::InvalidInput(
                "Slug must be non-empty lowercase letters, digits and hyphens.".into(),
            ));
        }

        let password_hash = hash_password(admin_password).await?;

        let mut tx = self.pool.begin().await?;

        let tenant = self.tenant_repo.create_tenant(&mut *tx, name, slug).await?;

        let admin = self
            .principal_repo
            .create(
                &mut *tx,
                tenant.id,
                admin_username,
                admin_email,
                &password_hash,
                Role::Admin,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(tenant = %tenant.slug, "bootstrapped new troop");
        Ok((tenant, admin))
    }
}
