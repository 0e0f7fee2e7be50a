use std::path::Path;

use axum::{
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::{metrics::encode_metrics, types::Health};

use crate::auth::{self, ServerState};

pub mod admin;
pub mod menu;
pub mod orders;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> (StatusCode, String) {
    encode_metrics()
}

/// Build the full application router, including public and admin routes.
/// When `static_dir` is given, unmatched paths are served from it with an
/// `index.html` fallback for client-side routing.
pub fn build_router(state: ServerState, cors: CorsLayer, static_dir: Option<&Path>) -> Router {
    // Public routes
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api/menu", get(menu::list_menu))
        .route("/api/orders", post(orders::place_order));

    // Admin routes, gated by the shared secret
    let admin_routes = Router::new()
        .route("/api/orders", get(orders::list_orders))
        .route("/api/admin/menu", post(admin::upsert_menu_item))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_admin_key,
        ));

    let mut app = public.merge(admin_routes);
    if let Some(dir) = static_dir {
        let static_files = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(static_files);
    }

    app.with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one span per request with method and path, at INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
