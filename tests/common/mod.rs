// Shared fixtures for the integration tests. Everything runs against an
// in-memory SQLite pool with the real migrations applied.

#![allow(dead_code)]

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

use quartermaster::{
    config::AppState,
    db,
    models::{
        auth::{Principal, Role},
        inventory::{Category, Item, Level, ShelfLocation, Side},
        tenancy::Tenant,
    },
};

pub async fn test_state() -> AppState {
    // A single connection keeps the in-memory database alive and shared for
    // the whole test.
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();

    db::MIGRATOR.run(&pool).await.unwrap();

    AppState::build(pool, "test-secret".into(), "test-bootstrap".into())
}

/// Creates a troop with its first admin, the starting point for every suite.
pub async fn bootstrap_troop(state: &AppState, slug: &str) -> (Tenant, Principal) {
    state
        .tenancy_service
        .bootstrap(
            &format!("Troop {slug}"),
            slug,
            "quartermaster",
            &format!("admin@{slug}.example"),
            "hunter2-strong",
        )
        .await
        .unwrap()
}

pub async fn add_member(
    state: &AppState,
    tenant: &Tenant,
    username: &str,
    role: Role,
) -> Principal {
    state
        .user_service
        .create(
            tenant.id,
            username,
            &format!("{username}@{}.example", tenant.slug),
            "hunter2-strong",
            role,
        )
        .await
        .unwrap()
}

pub fn left_high() -> ShelfLocation {
    ShelfLocation {
        side: Side::Left,
        level: Level::High,
    }
}

pub async fn add_item(state: &AppState, tenant: &Tenant, name: &str) -> Item {
    state
        .inventory_service
        .create_item(tenant.id, name, None, Category::Permanent, left_high())
        .await
        .unwrap()
}
