// src/db/item_repo.rs

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{Category, Item, ItemFilter, ItemStatus, Level, Side},
};

#[derive(Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scoped lookup. An id that exists under another tenant comes back as
    /// None, indistinguishable from a nonexistent id.
    pub async fn get<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let item = sqlx::query_as::<_, Item>("SELECT * FROM items WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(item)
    }

    /// Filtered listing. Filters are independent and ANDed together.
    pub async fn list(&self, tenant_id: Uuid, filter: &ItemFilter) -> Result<Vec<Item>, AppError> {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM items WHERE tenant_id = ");
        query.push_bind(tenant_id);

        if let Some(category) = filter.category {
            query.push(" AND category = ").push_bind(category);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(location) = filter.location {
            query.push(" AND side = ").push_bind(location.side);
            query.push(" AND level = ").push_bind(location.level);
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query.push(" AND (name LIKE ").push_bind(pattern.clone());
            query.push(" OR description LIKE ").push_bind(pattern);
            query.push(")");
        }

        query.push(" ORDER BY name ASC");

        let items = query
            .build_query_as::<Item>()
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        name: &str,
        description: Option<&str>,
        category: Category,
        side: Side,
        level: Level,
        qr_token: &str,
    ) -> Result<Item, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (id, tenant_id, name, description, category, side, level, status, qr_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(side)
        .bind(level)
        .bind(ItemStatus::Available)
        .bind(qr_token)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict("QR token collision, please retry.".into());
                }
            }
            e.into()
        })
    }

    /// Updates the descriptive fields. `status` is deliberately absent from
    /// the SET list; status only ever moves through `transition_status`, so
    /// this write can never overwrite a checkout that landed in between.
    pub async fn update<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        category: Category,
        side: Side,
        level: Level,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET name = $3, description = $4, category = $5, side = $6, level = $7,
                updated_at = $8
            WHERE tenant_id = $1 AND id = $2
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(category)
        .bind(side)
        .bind(level)
        .bind(Utc::now())
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn delete(&self, tenant_id: Uuid, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM items WHERE tenant_id = $1 AND id = $2")
            .bind(tenant_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Compare-and-swap on `status`. The WHERE clause carries the expected
    /// current status, so of two racing transitions only one can match; the
    /// loser gets None even though it read the old status a moment earlier.
    pub async fn transition_status<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        id: Uuid,
        from: ItemStatus,
        to: ItemStatus,
    ) -> Result<Option<Item>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let item = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET status = $4, updated_at = $5
            WHERE tenant_id = $1 AND id = $2 AND status = $3
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }
}
