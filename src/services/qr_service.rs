// src/services/qr_service.rs

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ItemRepository,
    models::{inventory::Item, tenancy::Tenant},
};

pub const PAYLOAD_KIND: &str = "item-ref";

/// What actually goes inside a QR code: a self-describing JSON object
/// naming one item within one troop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub item_id: Uuid,
    pub tenant_slug: String,
    pub issued_at: i64,
}

pub fn encode(item_id: Uuid, tenant_slug: &str) -> QrPayload {
    QrPayload {
        kind: PAYLOAD_KIND.to_string(),
        item_id,
        tenant_slug: tenant_slug.to_string(),
        issued_at: Utc::now().timestamp_millis(),
    }
}

/// Parses scanned data back into a payload. Anything that is not valid JSON
/// of the expected shape and kind is rejected as malformed; no partial
/// acceptance.
pub fn decode(data: &str) -> Result<QrPayload, AppError> {
    let payload: QrPayload =
        serde_json::from_str(data).map_err(|_| AppError::MalformedPayload)?;
    if payload.kind != PAYLOAD_KIND {
        return Err(AppError::MalformedPayload);
    }
    Ok(payload)
}

#[derive(Clone)]
pub struct QrService {
    pool: SqlitePool,
    item_repo: ItemRepository,
}

impl QrService {
    pub fn new(pool: SqlitePool, item_repo: ItemRepository) -> Self {
        Self { pool, item_repo }
    }

    /// Mints the payload for an existing item of the requesting troop.
    pub async fn mint(&self, tenant: &Tenant, item_id: Uuid) -> Result<QrPayload, AppError> {
        let item = self
            .item_repo
            .get(&self.pool, tenant.id, item_id)
            .await?
            .ok_or(AppError::NotFound)?;

        Ok(encode(item.id, &tenant.slug))
    }

    /// Decodes scanned data and resolves it to an item. The tenant boundary
    /// check comes first: a code minted by another troop is refused before
    /// any storage read, even if the item id would happen to exist here.
    pub async fn resolve(&self, tenant: &Tenant, data: &str) -> Result<Item, AppError> {
        let payload = decode(data)?;

        if payload.tenant_slug != tenant.slug {
            return Err(AppError::TenantMismatch);
        }

        self.item_repo
            .get(&self.pool, tenant.id, payload.item_id)
            .await?
            .ok_or(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_every_field() {
        let item_id = Uuid::new_v4();
        let payload = encode(item_id, "troop-7");
        let wire = serde_json::to_string(&payload).unwrap();

        let decoded = decode(&wire).unwrap();
        assert_eq!(decoded, payload);
        assert_eq!(decoded.item_id, item_id);
        assert_eq!(decoded.tenant_slug, "troop-7");
    }

    #[test]
    fn wire_format_uses_the_documented_field_names() {
        let payload = encode(Uuid::new_v4(), "troop-7");
        let wire: serde_json::Value = serde_json::to_value(&payload).unwrap();

        assert_eq!(wire["type"], "item-ref");
        assert!(wire["itemId"].is_string());
        assert_eq!(wire["tenantSlug"], "troop-7");
        assert!(wire["issuedAt"].is_i64());
    }

    #[test]
    fn garbage_and_wrong_kinds_are_malformed() {
        for data in [
            "",
            "not json",
            "{}",
            r#"{"type":"user-ref","itemId":"0be0cd17-9fb5-4c3a-a46e-11a8a9e9a0aa","tenantSlug":"troop-7","issuedAt":1}"#,
            r#"{"type":"item-ref","itemId":"not-a-uuid","tenantSlug":"troop-7","issuedAt":1}"#,
        ] {
            assert!(
                matches!(decode(data), Err(AppError::MalformedPayload)),
                "expected MalformedPayload for {data:?}"
            );
        }
    }
}
