use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use service::orders::{NewOrder, Order, OrderReceipt};
use tracing::debug;

use crate::auth::ServerState;
use crate::errors::ApiError;

/// Place an order; responds 201 with the generated id, timestamp and status
pub async fn place_order(
    State(state): State<ServerState>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderReceipt>), ApiError> {
    let Json(new_order) = payload.map_err(|rejection| {
        debug!(error = %rejection, "order body rejected");
        ApiError::bad_request("Invalid order data")
    })?;
    let receipt = state
        .orders
        .place_order(new_order)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to place order"))?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// List every order (admin)
pub async fn list_orders(State(state): State<ServerState>) -> Result<Json<Vec<Order>>, ApiError> {
    state
        .orders
        .list_orders()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "Failed to fetch orders"))
}
