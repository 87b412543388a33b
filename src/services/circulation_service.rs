// src/services/circulation_service.rs

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ItemRepository, LedgerRepository, PrincipalRepository},
    models::{
        inventory::{Item, ItemStatus},
        ledger::{LedgerAction, Transaction},
    },
};

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    /// Free-text name of whoever is walking away with the gear.
    pub checked_out_by: String,
    /// Their account, when they have one.
    pub principal_id: Option<Uuid>,
    pub expected_return_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// The transactional core. Both operations run the status check, the status
/// flip and the ledger append inside a single database transaction; the flip
/// itself is a compare-and-swap, so of two concurrent checkouts on the same
/// item exactly one commits and the other surfaces InvalidTransition.
#[derive(Clone)]
pub struct CirculationService {
    pool: SqlitePool,
    item_repo: ItemRepository,
    ledger_repo: LedgerRepository,
    principal_repo: PrincipalRepository,
}

impl CirculationService {
    pub fn new(
        pool: SqlitePool,
        item_repo: ItemRepository,
        ledger_repo: LedgerRepository,
        principal_repo: PrincipalRepository,
    ) -> Self {
        Self {
            pool,
            item_repo,
            ledger_repo,
            principal_repo,
        }
    }

    pub async fn checkout(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        request: CheckoutRequest,
    ) -> Result<Item, AppError> {
        let mut tx = self.pool.begin().await?;

        // A borrower reference must name a live principal of this troop. The
        // check rides the same transaction as the ledger insert that will
        // reference the row, so a deletion cannot slip in between.
        if let Some(principal_id) = request.principal_id {
            self.principal_repo
                .get(&mut *tx, tenant_id, principal_id)
                .await?
                .ok_or_else(|| {
                    AppError::InvalidInput("principalId does not belong to this troop.".into())
                })?;
        }

        let item = self
            .item_repo
            .get(&mut *tx, tenant_id, item_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if item.status != ItemStatus::Available {
            return Err(AppError::InvalidTransition(
                "Item is not available for checkout.".into(),
            ));
        }

        let updated = self
            .item_repo
            .transition_status(
                &mut *tx,
                tenant_id,
                item_id,
                ItemStatus::Available,
                ItemStatus::CheckedOut,
            )
            .await?
            // The CAS missed: someone else won the race between our read
            // and our write.
            .ok_or_else(|| {
                AppError::InvalidTransition("Item is not available for checkout.".into())
            })?;

        self.ledger_repo
            .append(
                &mut *tx,
                tenant_id,
                item_id,
                request.principal_id,
                LedgerAction::CheckOut,
                Some(&request.checked_out_by),
                request.expected_return_at,
                request.notes.as_deref(),
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn checkin(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
        acting_principal_id: Uuid,
        notes: Option<&str>,
    ) -> Result<Item, AppError> {
        let mut tx = self.pool.begin().await?;

        let item = self
            .item_repo
            .get(&mut *tx, tenant_id, item_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if item.status != ItemStatus::CheckedOut {
            return Err(AppError::InvalidTransition(
                "Item is not checked out.".into(),
            ));
        }

        let updated = self
            .item_repo
            .transition_status(
                &mut *tx,
                tenant_id,
                item_id,
                ItemStatus::CheckedOut,
                ItemStatus::Available,
            )
            .await?
            .ok_or_else(|| AppError::InvalidTransition("Item is not checked out.".into()))?;

        self.ledger_repo
            .append(
                &mut *tx,
                tenant_id,
                item_id,
                Some(acting_principal_id),
                LedgerAction::CheckIn,
                None,
                None,
                notes,
            )
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Ledger history for one item, oldest entry first.
    pub async fn history(
        &self,
        tenant_id: Uuid,
        item_id: Uuid,
    ) -> Result<Vec<Transaction>, AppError> {
        // Existence check keeps cross-tenant ids indistinguishable from
        // unknown ones.
        self.item_repo
            .get(&self.pool, tenant_id, item_id)
            .await?
            .ok_or(AppError::NotFound)?;

        self.ledger_repo.list_for_item(tenant_id, item_id).await
    }
}
