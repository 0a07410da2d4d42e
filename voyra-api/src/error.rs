use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use voyra_domain::error::PluginError;

/// HTTP status for each error kind. The RPC transport maps the same taxonomy
/// in `rpc::to_status`; the two tables must stay in step.
pub fn status_for(err: &PluginError) -> StatusCode {
    match err {
        PluginError::Configuration(_) => StatusCode::BAD_REQUEST,
        PluginError::UnsupportedCapability(_) => StatusCode::NOT_IMPLEMENTED,
        PluginError::InvalidState(_) => StatusCode::CONFLICT,
        PluginError::NotFound(_) => StatusCode::NOT_FOUND,
        PluginError::BackendUnavailable(_) => StatusCode::BAD_GATEWAY,
    }
}

#[derive(Debug)]
pub struct ApiError(pub PluginError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let PluginError::BackendUnavailable(msg) = &self.0 {
            tracing::error!("backend unavailable: {}", msg);
        }
        let body = Json(json!({
            "error": self.0.kind(),
            "message": self.0.to_string(),
        }));
        (status_for(&self.0), body).into_response()
    }
}

impl From<PluginError> for ApiError {
    fn from(err: PluginError) -> Self {
        ApiError(err)
    }
}
