// src/main.rs

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use quartermaster::{config::AppState, db, handlers, middleware::auth::tenant_guard};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .compact()
        .init();

    // If configuration is broken the process should not come up at all.
    let app_state = AppState::new()
        .await
        .expect("failed to initialize application state");

    db::MIGRATOR
        .run(&app_state.db_pool)
        .await
        .expect("failed to run database migrations");
    tracing::info!("database migrations applied");

    // Public: login only needs the troop selector header.
    let auth_routes = Router::new().route("/login", post(handlers::auth::login));

    // Guarded by the deployment bootstrap secret instead of a JWT.
    let tenant_routes = Router::new().route("/", post(handlers::tenancy::bootstrap_tenant));

    let item_routes = Router::new()
        .route(
            "/",
            post(handlers::inventory::create_item).get(handlers::inventory::list_items),
        )
        .route(
            "/{id}",
            get(handlers::inventory::get_item)
                .put(handlers::inventory::update_item)
                .delete(handlers::inventory::delete_item),
        )
        .route("/{id}/checkout", post(handlers::circulation::checkout))
        .route("/{id}/checkin", post(handlers::circulation::checkin))
        .route("/{id}/transactions", get(handlers::circulation::history));

    let qr_routes = Router::new()
        .route("/scan", post(handlers::qr::scan))
        .route("/{item_id}", get(handlers::qr::mint));

    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route("/me/password", put(handlers::users::change_my_password));

    // Everything tenant-scoped goes through the one guard that validates the
    // bearer token, resolves x-troop-slug and cross-checks the two.
    let tenant_scoped = Router::new()
        .nest("/api/items", item_routes)
        .nest("/api/qr", qr_routes)
        .nest("/api/users", user_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/tenants", tenant_routes)
        .merge(tenant_scoped)
        .with_state(app_state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr)
        .await
        .expect("failed to bind TCP listener");
    tracing::info!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("server error");
}
