use axum::{extract::State, Json};
use service::menu::MenuItem;

use crate::auth::ServerState;
use crate::errors::ApiError;

/// List every menu item
pub async fn list_menu(State(state): State<ServerState>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    state
        .menu
        .list_menu()
        .await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, "Failed to fetch menu"))
}
