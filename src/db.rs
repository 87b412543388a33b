use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

pub mod item_repo;
pub use item_repo::ItemRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod principal_repo;
pub use principal_repo::PrincipalRepository;
pub mod tenant_repo;
pub use tenant_repo::TenantRepository;

// Embedded at compile time from migrations/.
pub static MIGRATOR: Migrator = sqlx::migrate!();

/// Opens the connection pool. Foreign keys are enforced per connection;
/// the cascade behavior of the schema depends on it.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
}
