mod common;

use common::{add_item, bootstrap_troop, test_state};
use quartermaster::{
    common::error::AppError,
    services::qr_service::{self, PAYLOAD_KIND},
};

#[tokio::test]
async fn mint_and_resolve_within_the_same_troop() {
    let state = test_state().await;
    let (troop, _) = bootstrap_troop(&state, "troop-7").await;
    let tent = add_item(&state, &troop, "4-Person Tent").await;

    let payload = state.qr_service.mint(&troop, tent.id).await.unwrap();
    assert_eq!(payload.kind, PAYLOAD_KIND);
    assert_eq!(payload.item_id, tent.id);
    assert_eq!(payload.tenant_slug, "troop-7");

    let wire = serde_json::to_string(&payload).unwrap();
    let resolved = state.qr_service.resolve(&troop, &wire).await.unwrap();
    assert_eq!(resolved.id, tent.id);
    assert_eq!(resolved.name, "4-Person Tent");
}

#[tokio::test]
async fn mint_refuses_foreign_and_unknown_items() {
    let state = test_state().await;
    let (troop_7, _) = bootstrap_troop(&state, "troop-7").await;
    let (troop_9, _) = bootstrap_troop(&state, "troop-9").await;
    let tent = add_item(&state, &troop_7, "4-Person Tent").await;

    let foreign = state.qr_service.mint(&troop_9, tent.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound)));
}

// A code minted by troop-7 is refused by troop-9 before any lookup, no
// matter what the item id is.
#[tokio::test]
async fn resolve_rejects_codes_minted_elsewhere() {
    let state = test_state().await;
    let (troop_7, _) = bootstrap_troop(&state, "troop-7").await;
    let (troop_9, _) = bootstrap_troop(&state, "troop-9").await;
    let tent = add_item(&state, &troop_7, "4-Person Tent").await;

    let payload = state.qr_service.mint(&troop_7, tent.id).await.unwrap();
    let wire = serde_json::to_string(&payload).unwrap();

    let crossed = state.qr_service.resolve(&troop_9, &wire).await;
    assert!(matches!(crossed, Err(AppError::TenantMismatch)));

    // Even a payload naming an item troop-9 actually owns is refused when
    // the slug says it was minted elsewhere.
    let own_item = add_item(&state, &troop_9, "Dutch Oven").await;
    let forged = serde_json::to_string(&qr_service::encode(own_item.id, "troop-7")).unwrap();
    let crossed = state.qr_service.resolve(&troop_9, &forged).await;
    assert!(matches!(crossed, Err(AppError::TenantMismatch)));
}

#[tokio::test]
async fn resolve_rejects_malformed_data_and_dangling_refs() {
    let state = test_state().await;
    let (troop, _) = bootstrap_troop(&state, "troop-7").await;
    let tent = add_item(&state, &troop, "4-Person Tent").await;

    let garbage = state.qr_service.resolve(&troop, "{{{").await;
    assert!(matches!(garbage, Err(AppError::MalformedPayload)));

    let wrong_kind = serde_json::json!({
        "type": "member-badge",
        "itemId": tent.id,
        "tenantSlug": "troop-7",
        "issuedAt": 0,
    })
    .to_string();
    let wrong_kind = state.qr_service.resolve(&troop, &wrong_kind).await;
    assert!(matches!(wrong_kind, Err(AppError::MalformedPayload)));

    // A well-formed code whose item has since been deleted: plain NotFound.
    let payload = state.qr_service.mint(&troop, tent.id).await.unwrap();
    let wire = serde_json::to_string(&payload).unwrap();
    state
        .inventory_service
        .delete_item(troop.id, tent.id)
        .await
        .unwrap();
    let dangling = state.qr_service.resolve(&troop, &wire).await;
    assert!(matches!(dangling, Err(AppError::NotFound)));
}

#[tokio::test]
async fn qr_tokens_are_globally_unique() {
    let state = test_state().await;
    let (troop_7, _) = bootstrap_troop(&state, "troop-7").await;
    let (troop_9, _) = bootstrap_troop(&state, "troop-9").await;

    let a = add_item(&state, &troop_7, "Tent A").await;
    let b = add_item(&state, &troop_7, "Tent B").await;
    let c = add_item(&state, &troop_9, "Tent C").await;

    assert_ne!(a.qr_token, b.qr_token);
    assert_ne!(a.qr_token, c.qr_token);
    assert_ne!(b.qr_token, c.qr_token);
}
