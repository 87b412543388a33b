// src/models/ledger.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    CheckOut,
    CheckIn,
}

// One immutable ledger entry. Rows are only ever inserted by the
// checkout/checkin state machine and only ever removed by cascade.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub item_id: Uuid,

    // None when the checkout was recorded for a walk-up person with no
    // account; performed_by_label carries their name instead.
    pub principal_id: Option<Uuid>,

    pub action: LedgerAction,
    pub performed_by_label: Option<String>,
    pub expected_return_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub occurred_at: DateTime<Utc>,
}
