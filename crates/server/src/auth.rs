use axum::{extract::{Request, State}, middleware::Next, response::Response};
use service::{guard::AccessGuard, menu::MenuService, orders::OrderService};
use tracing::warn;

use crate::errors::ApiError;

/// Header carrying the admin shared secret.
pub const ADMIN_KEY_HEADER: &str = "x-admin-key";

#[derive(Clone)]
pub struct ServerState {
    pub menu: MenuService,
    pub orders: OrderService,
    pub guard: AccessGuard,
}

/// Middleware: reject privileged requests whose `x-admin-key` does not match.
pub async fn require_admin_key(
    State(state): State<ServerState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = req
        .headers()
        .get(ADMIN_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !state.guard.authorize(provided) {
        warn!(path = %req.uri().path(), key_present = provided.is_some(), "admin key rejected");
        return Err(ApiError::unauthorized());
    }

    Ok(next.run(req).await)
}
