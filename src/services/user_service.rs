// src/services/user_service.rs

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PrincipalRepository,
    models::auth::{Principal, Role},
    services::auth::{hash_password, verify_password},
};

#[derive(Clone)]
pub struct UserService {
    pool: SqlitePool,
    principal_repo: PrincipalRepository,
}

impl UserService {
    pub fn new(pool: SqlitePool, principal_repo: PrincipalRepository) -> Self {
        Self {
            pool,
            principal_repo,
        }
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Principal>, AppError> {
        self.principal_repo.list(tenant_id).await
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Principal, AppError> {
        let password_hash = hash_password(password).await?;
        self.principal_repo
            .create(
                &self.pool,
                tenant_id,
                username,
                email,
                &password_hash,
                role,
            )
            .await
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        acting: &Principal,
        target_id: Uuid,
        username: Option<String>,
        email: Option<String>,
        role: Option<Role>,
    ) -> Result<Principal, AppError> {
        let target = self
            .principal_repo
            .get(&self.pool, tenant_id, target_id)
            .await?
            .ok_or(AppError::NotFound)?;

        // Lockout protection: the last thing we want is a troop whose only
        // admin demoted themself.
        if let Some(new_role) = role {
            if target.id == acting.id && target.role == Role::Admin && new_role != Role::Admin {
                return Err(AppError::InvalidInput(
                    "An admin cannot change their own role away from admin.".into(),
                ));
            }
        }

        let username = username.unwrap_or(target.username);
        let email = email.unwrap_or(target.email);
        let role = role.unwrap_or(target.role);

        self.principal_repo
            .update(tenant_id, target_id, &username, &email, role)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn delete(
        &self,
        tenant_id: Uuid,
        acting: &Principal,
        target_id: Uuid,
    ) -> Result<(), AppError> {
        if acting.id == target_id {
            return Err(AppError::InvalidInput(
                "You cannot delete your own account.".into(),
            ));
        }

        let rows = self.principal_repo.delete(tenant_id, target_id).await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    /// Any principal may rotate their own password, regardless of role,
    /// after proving they know the current one.
    pub async fn change_password(
        &self,
        acting: &Principal,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if !verify_password(current_password, &acting.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let password_hash = hash_password(new_password).await?;
        let rows = self
            .principal_repo
            .update_password(acting.tenant_id, acting.id, &password_hash)
            .await?;
        if rows == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
