use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use service::menu::MenuItemFields;
use tracing::debug;

use crate::auth::ServerState;
use crate::errors::ApiError;

/// Admin menu edit: update when `id` is truthy, create otherwise.
///
/// `id` may be any JSON value; a truthy id that matches no item is a 404.
#[derive(Debug, Deserialize)]
pub struct MenuUpsertRequest {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub fields: MenuItemFields,
}

#[derive(Debug, Serialize)]
pub struct MenuUpsertResponse {
    pub success: bool,
    pub message: &'static str,
}

pub async fn upsert_menu_item(
    State(state): State<ServerState>,
    payload: Result<Json<MenuUpsertRequest>, JsonRejection>,
) -> Result<Json<MenuUpsertResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        debug!(error = %rejection, "menu body rejected");
        ApiError::bad_request("Invalid request body")
    })?;
    state
        .menu
        .upsert_menu_item(req.id.as_ref(), req.fields)
        .await
        .map_err(|e| ApiError::from_service(e, "Failed to update menu"))?;
    Ok(Json(MenuUpsertResponse { success: true, message: "Menu updated" }))
}
