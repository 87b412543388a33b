// src/config.rs

use sqlx::SqlitePool;
use std::env;

use crate::{
    db::{self, ItemRepository, LedgerRepository, PrincipalRepository, TenantRepository},
    services::{
        auth::AuthService, circulation_service::CirculationService,
        inventory_service::InventoryService, qr_service::QrService,
        tenancy_service::TenancyService, user_service::UserService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub bootstrap_token: String,
    pub auth_service: AuthService,
    pub tenancy_service: TenancyService,
    pub inventory_service: InventoryService,
    pub circulation_service: CirculationService,
    pub qr_service: QrService,
    pub user_service: UserService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://quartermaster.db".to_string());
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?;
        let bootstrap_token = env::var("BOOTSTRAP_TOKEN")
            .map_err(|_| anyhow::anyhow!("BOOTSTRAP_TOKEN must be set"))?;

        let db_pool = db::connect(&database_url).await?;
        tracing::info!("database connection established");

        Ok(Self::build(db_pool, jwt_secret, bootstrap_token))
    }

    /// Wires the dependency graph. Split out of `new` so the integration
    /// tests can hand in an in-memory pool.
    pub fn build(db_pool: SqlitePool, jwt_secret: String, bootstrap_token: String) -> Self {
        let tenant_repo = TenantRepository::new(db_pool.clone());
        let principal_repo = PrincipalRepository::new(db_pool.clone());
        let item_repo = ItemRepository::new(db_pool.clone());
        let ledger_repo = LedgerRepository::new(db_pool.clone());

        let auth_service = AuthService::new(principal_repo.clone(), jwt_secret);
        let tenancy_service = TenancyService::new(
            db_pool.clone(),
            tenant_repo.clone(),
            principal_repo.clone(),
        );
        let inventory_service = InventoryService::new(db_pool.clone(), item_repo.clone());
        let circulation_service = CirculationService::new(
            db_pool.clone(),
            item_repo.clone(),
            ledger_repo.clone(),
            principal_repo.clone(),
        );
        let qr_service = QrService::new(db_pool.clone(), item_repo);
        let user_service = UserService::new(db_pool.clone(), principal_repo);

        Self {
            db_pool,
            bootstrap_token,
            auth_service,
            tenancy_service,
            inventory_service,
            circulation_service,
            qr_service,
            user_service,
        }
    }
}
