use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::auth::ServerState;
use crate::routes;
use service::{
    guard::AccessGuard,
    menu::MenuService,
    orders::OrderService,
    runtime,
    storage::CollectionStore,
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Wire the services from configuration.
pub fn build_state(cfg: &AppConfig) -> ServerState {
    let store = CollectionStore::from_config(&cfg.storage);
    ServerState {
        menu: MenuService::new(store.clone()),
        orders: OrderService::new(store),
        guard: AccessGuard::from_config(&cfg.admin),
    }
}

/// Build the application router for `cfg`.
pub fn build_app(cfg: &AppConfig) -> Router {
    routes::build_router(build_state(cfg), build_cors(), cfg.server.static_dir.as_deref())
}

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::metrics::init_metrics();
    runtime::ensure_env(&cfg).await?;

    if cfg.admin.uses_default_key() {
        warn!("admin key is the built-in default; set ADMIN_KEY or admin.api_key");
    }
    info!(
        menu = %cfg.storage.menu_path().display(),
        orders = %cfg.storage.orders_path().display(),
        write_policy = ?cfg.storage.write_policy,
        "storage configured"
    );

    let app = build_app(&cfg);

    let listener = tokio::net::TcpListener::bind(cfg.server.bind_addr()).await?;
    let addr = listener.local_addr()?;
    info!(%addr, "starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; shutdown only by process exit");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
