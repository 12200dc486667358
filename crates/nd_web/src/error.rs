use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Maps core errors onto JSON error responses.
#[derive(Debug)]
pub struct ApiError(pub nd_core::Error);

impl From<nd_core::Error> for ApiError {
    fn from(err: nd_core::Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            nd_core::Error::InvalidWindow(_) | nd_core::Error::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
