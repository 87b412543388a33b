mod common;

use common::{add_item, add_member, bootstrap_troop, test_state};
use quartermaster::{
    common::error::AppError,
    models::{
        auth::Role,
        inventory::{ItemStatus, ShelfLocation},
        ledger::LedgerAction,
    },
    services::{circulation_service::CheckoutRequest, inventory_service::ItemPatch},
};

fn checkout_by(label: &str) -> CheckoutRequest {
    CheckoutRequest {
        checked_out_by: label.to_string(),
        principal_id: None,
        expected_return_at: None,
        notes: None,
    }
}

// The full scenario from the drawing board: create, check out, fail a second
// checkout, check in, and end with a clean two-entry ledger.
#[tokio::test]
async fn tent_lifecycle_scenario() {
    let state = test_state().await;
    let (troop, admin) = bootstrap_troop(&state, "troop-7").await;
    let tent = add_item(&state, &troop, "4-Person Tent").await;
    assert_eq!(tent.status, ItemStatus::Available);

    let tent = state
        .circulation_service
        .checkout(troop.id, tent.id, checkout_by("Alex"))
        .await
        .unwrap();
    assert_eq!(tent.status, ItemStatus::CheckedOut);

    let second = state
        .circulation_service
        .checkout(troop.id, tent.id, checkout_by("Sam"))
        .await;
    assert!(matches!(second, Err(AppError::InvalidTransition(_))));

    let (troop_id, admin_id) = (troop.id, admin.id);
    let tent = state
        .circulation_service
        .checkin(troop_id, tent.id, admin_id, Some("all pegs accounted for"))
        .await
        .unwrap();
    assert_eq!(tent.status, ItemStatus::Available);

    let ledger = state
        .circulation_service
        .history(troop_id, tent.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger[0].action, LedgerAction::CheckOut);
    assert_eq!(ledger[0].performed_by_label.as_deref(), Some("Alex"));
    assert_eq!(ledger[1].action, LedgerAction::CheckIn);
    assert_eq!(ledger[1].principal_id, Some(admin_id));
    assert!(ledger[0].occurred_at <= ledger[1].occurred_at);
}

#[tokio::test]
async fn failed_checkout_appends_nothing() {
    let state = test_state().await;
    let (troop, _) = bootstrap_troop(&state, "troop-7").await;
    let stove = add_item(&state, &troop, "Camp Stove").await;

    state
        .circulation_service
        .checkout(troop.id, stove.id, checkout_by("Alex"))
        .await
        .unwrap();

    // Already checked out: must reject and must not grow the ledger.
    let err = state
        .circulation_service
        .checkout(troop.id, stove.id, checkout_by("Sam"))
        .await;
    assert!(matches!(err, Err(AppError::InvalidTransition(_))));

    let ledger = state
        .circulation_service
        .history(troop.id, stove.id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);
}

#[tokio::test]
async fn checkin_of_available_item_appends_nothing() {
    let state = test_state().await;
    let (troop, admin) = bootstrap_troop(&state, "troop-7").await;
    let rope = add_item(&state, &troop, "Climbing Rope").await;

    let err = state
        .circulation_service
        .checkin(troop.id, rope.id, admin.id, None)
        .await;
    assert!(matches!(err, Err(AppError::InvalidTransition(_))));

    let ledger = state
        .circulation_service
        .history(troop.id, rope.id)
        .await
        .unwrap();
    assert!(ledger.is_empty());
}

// Two racing checkouts: exactly one winner, exactly one ledger entry.
#[tokio::test]
async fn concurrent_checkouts_have_a_single_winner() {
    let state = test_state().await;
    let (troop, _) = bootstrap_troop(&state, "troop-7").await;
    let tent = add_item(&state, &troop, "4-Person Tent").await;

    let service_a = state.circulation_service.clone();
    let service_b = state.circulation_service.clone();
    let (troop_id, item_id) = (troop.id, tent.id);

    let a = tokio::spawn(async move {
        service_a
            .checkout(troop_id, item_id, checkout_by("Alex"))
            .await
    });
    let b = tokio::spawn(async move {
        service_b
            .checkout(troop_id, item_id, checkout_by("Sam"))
            .await
    });

    let results = [a.await.unwrap(), b.await.unwrap()];
    let wins = results.iter().filter(|r| r.is_ok()).count();
    let losses = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::InvalidTransition(_))))
        .count();
    assert_eq!(wins, 1);
    assert_eq!(losses, 1);

    let ledger = state
        .circulation_service
        .history(troop_id, item_id)
        .await
        .unwrap();
    assert_eq!(ledger.len(), 1);

    let item = state
        .inventory_service
        .get_item(troop_id, item_id)
        .await
        .unwrap();
    assert_eq!(item.status, ItemStatus::CheckedOut);
}

// status == checked_out iff the latest ledger entry is a check_out.
#[tokio::test]
async fn status_agrees_with_latest_ledger_entry() {
    let state = test_state().await;
    let (troop, admin) = bootstrap_troop(&state, "troop-7").await;
    let lantern = add_item(&state, &troop, "Lantern").await;

    for round in 0..3 {
        state
            .circulation_service
            .checkout(troop.id, lantern.id, checkout_by("Alex"))
            .await
            .unwrap();
        let item = state
            .inventory_service
            .get_item(troop.id, lantern.id)
            .await
            .unwrap();
        let ledger = state
            .circulation_service
            .history(troop.id, lantern.id)
            .await
            .unwrap();
        assert_eq!(item.status, ItemStatus::CheckedOut);
        assert_eq!(ledger.last().unwrap().action, LedgerAction::CheckOut);
        assert_eq!(ledger.len(), round * 2 + 1);

        state
            .circulation_service
            .checkin(troop.id, lantern.id, admin.id, None)
            .await
            .unwrap();
        let item = state
            .inventory_service
            .get_item(troop.id, lantern.id)
            .await
            .unwrap();
        let ledger = state
            .circulation_service
            .history(troop.id, lantern.id)
            .await
            .unwrap();
        assert_eq!(item.status, ItemStatus::Available);
        assert_eq!(ledger.last().unwrap().action, LedgerAction::CheckIn);
        assert_eq!(ledger.len(), round * 2 + 2);
    }
}

#[tokio::test]
async fn needs_repair_blocks_checkout_until_cleared() {
    let state = test_state().await;
    let (troop, _) = bootstrap_troop(&state, "troop-7").await;
    let saw = add_item(&state, &troop, "Bow Saw").await;

    // Flag for repair through the administrative update.
    let saw = state
        .inventory_service
        .update_item(
            troop.id,
            saw.id,
            ItemPatch {
                status: Some(ItemStatus::NeedsRepair),
                ..ItemPatch::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(saw.status, ItemStatus::NeedsRepair);

    let err = state
        .circulation_service
        .checkout(troop.id, saw.id, checkout_by("Alex"))
        .await;
    assert!(matches!(err, Err(AppError::InvalidTransition(_))));

    // There is no automatic way back; the explicit update clears the flag.
    state
        .inventory_service
        .update_item(
            troop.id,
            saw.id,
            ItemPatch {
                status: Some(ItemStatus::Available),
                ..ItemPatch::default()
            },
        )
        .await
        .unwrap();

    state
        .circulation_service
        .checkout(troop.id, saw.id, checkout_by("Alex"))
        .await
        .unwrap();
}

#[tokio::test]
async fn checkout_rejects_borrower_from_another_troop() {
    let state = test_state().await;
    let (troop_7, _) = bootstrap_troop(&state, "troop-7").await;
    let (_troop_9, other_admin) = bootstrap_troop(&state, "troop-9").await;
    let tent = add_item(&state, &troop_7, "4-Person Tent").await;

    let request = CheckoutRequest {
        checked_out_by: "Alex".into(),
        principal_id: Some(other_admin.id),
        expected_return_at: None,
        notes: None,
    };
    let err = state
        .circulation_service
        .checkout(troop_7.id, tent.id, request)
        .await;
    assert!(matches!(err, Err(AppError::InvalidInput(_))));

    // Nothing happened: still available, ledger empty.
    let item = state
        .inventory_service
        .get_item(troop_7.id, tent.id)
        .await
        .unwrap();
    assert_eq!(item.status, ItemStatus::Available);
    let ledger = state
        .circulation_service
        .history(troop_7.id, tent.id)
        .await
        .unwrap();
    assert!(ledger.is_empty());
}

// The borrower reference is verified in the same transaction that writes the
// ledger row, so a deleted account fails as bad input, never as a foreign
// key blowup.
#[tokio::test]
async fn checkout_rejects_a_deleted_borrower() {
    let state = test_state().await;
    let (troop, admin) = bootstrap_troop(&state, "troop-7").await;
    let scout = add_member(&state, &troop, "alex", Role::Scout).await;
    let tent = add_item(&state, &troop, "4-Person Tent").await;

    state
        .user_service
        .delete(troop.id, &admin, scout.id)
        .await
        .unwrap();

    let request = CheckoutRequest {
        checked_out_by: "Alex".into(),
        principal_id: Some(scout.id),
        expected_return_at: None,
        notes: None,
    };
    let err = state
        .circulation_service
        .checkout(troop.id, tent.id, request)
        .await;
    assert!(matches!(err, Err(AppError::InvalidInput(_))));

    let item = state
        .inventory_service
        .get_item(troop.id, tent.id)
        .await
        .unwrap();
    assert_eq!(item.status, ItemStatus::Available);
    let ledger = state
        .circulation_service
        .history(troop.id, tent.id)
        .await
        .unwrap();
    assert!(ledger.is_empty());
}

#[tokio::test]
async fn location_strings_round_trip() {
    let loc: ShelfLocation = "right-middle".parse().unwrap();
    assert_eq!(loc.to_string(), "right-middle");
    assert!("left".parse::<ShelfLocation>().is_err());
    assert!("left-up".parse::<ShelfLocation>().is_err());
    assert!("center-low".parse::<ShelfLocation>().is_err());
}
