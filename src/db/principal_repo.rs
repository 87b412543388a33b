// src/db/principal_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{Principal, Role},
};

#[derive(Clone)]
pub struct PrincipalRepository {
    pool: SqlitePool,
}

impl PrincipalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Unscoped lookup by id. Only the auth middleware uses this, to
    /// re-validate a token's subject; it compares tenant_id itself.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Principal>, AppError> {
        let principal = sqlx::query_as::<_, Principal>("SELECT * FROM principals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(principal)
    }

    pub async fn find_by_email(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<Principal>, AppError> {
        let principal = sqlx::query_as::<_, Principal>(
            "SELECT * FROM principals WHERE tenant_id = $1 AND email = $2",
        )
        .bind(tenant_id)
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(principal)
    }

    pub async fn get<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Principal>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let principal = sqlx::query_as::<_, Principal>(
            "SELECT * FROM principals WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(principal)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<Principal>, AppError> {
        let principals = sqlx::query_as::<_, Principal>(
            "SELECT * FROM principals WHERE tenant_id = $1 ORDER BY username ASC",
        )
        .bind(tenant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(principals)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<Principal, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Principal>(
            r#"
            INSERT INTO principals (id, tenant_id, username, email, password_hash, role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "The e-mail '{email}' is already registered in this troop."
                    ));
                }
            }
            e.into()
        })
    }

    pub async fn update(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        username: &str,
        email: &str,
        role: Role,
    ) -> Result<Option<Principal>, AppError> {
        sqlx::query_as::<_, Principal>(
            r#"
            UPDATE principals
            SET username = $3, email = $4, role = $5, updated_at = $6
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(role)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!(
                        "The e-mail '{email}' is already registered in this troop."
                    ));
                }
            }
            e.into()
        })
    }

    pub async fn update_password(
        &self,
        tenant_id: Uuid,
        id: Uuid,
        password_hash: &str,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE principals SET password_hash = $3, updated_at = $4 WHERE tenant_id = $1 AND id = $2",
        )
        .bind(tenant_id)
        .bind(id)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM principals WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
