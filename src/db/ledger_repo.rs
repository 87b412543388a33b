// src/db/ledger_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::ledger::{LedgerAction, Transaction},
};

// Append-only. There is deliberately no update or delete here; rows vanish
// only through the item/tenant cascades.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

impl LedgerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn append<'e, E>(
        &self,
        executor: E,
        tenant_id: Uuid,
        item_id: Uuid,
        principal_id: Option<Uuid>,
        action: LedgerAction,
        performed_by_label: Option<&str>,
        expected_return_at: Option<DateTime<Utc>>,
        notes: Option<&str>,
    ) -> Result<Transaction, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let entry = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (id, tenant_id, item_id, principal_id, action, performed_by_label,
                 expected_return_at, notes, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(tenant_id)
        .bind(item_id)
        .bind(principal_id)
        .bind(action)
        .bind(performed_by_label)
        .bind(expected_return_at)
        .bind(notes)
        .bind(Utc::now())
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    /// History for one item, oldest first. rowid breaks occurred_at ties so
    /// the order always reflects true insertion order.
    pub async fn list_for_item(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<Vec<Transaction>, AppError> {
        let entries = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT * FROM transactions
            WHERE tenant_id = $1 AND item_id = $2
            ORDER BY occurred_at ASC, rowid ASC
            "#,
        )
        .bind(tenant_id)
        .bind(item_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }
}
