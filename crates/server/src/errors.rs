use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use tracing::error;

/// Error response rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::FORBIDDEN, "Unauthorized")
    }

    /// Map a service failure; internal errors are logged and replaced by `internal_msg`.
    pub fn from_service(err: ServiceError, internal_msg: &str) -> Self {
        match err {
            ServiceError::InvalidOrder(_) => Self::bad_request("Invalid order data"),
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Item not found"),
            ServiceError::Decode { .. } | ServiceError::Storage { .. } => {
                error!(error = %err, "{}", internal_msg);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, internal_msg)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"error": self.message}))).into_response()
    }
}
