// =============================================================================
// API Errors: JSON error bodies for the HTTP layer
// =============================================================================
//
// Data-quality problems inside the candles never reach this type; they become
// NA values in the snapshot. Only requests the service cannot read at all, or
// that exceed configured limits, are rejected here.
// =============================================================================

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// The body was not a readable `SignalsRequest`.
    InvalidBody(JsonRejection),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(msg) => write!(f, "bad_request: {msg}"),
            Self::InvalidBody(rejection) => write!(f, "invalid_body: {}", rejection.body_text()),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::InvalidBody(rejection) => (rejection.status(), rejection.body_text()),
        };

        let body = json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::InvalidBody(rejection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_request_maps_to_400() {
        let response = ApiError::BadRequest("too many candles".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn display_is_prefixed() {
        let err = ApiError::BadRequest("nope".into());
        assert_eq!(err.to_string(), "bad_request: nope");
    }
}
