//! Handler errors and their mapping to failure envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::http::response::Envelope;
use crate::upstream::UpstreamError;

/// Message returned for any failure that is not an invalid id.
pub const FAILED_TO_CALL_SERVER: &str = "Failed to call the server";
/// Message returned when the id does not convert to a number.
pub const INVALID_ID: &str = "Invalid ID";

/// Errors raised while handling a call-server request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The `id` is not a number. No upstream call was made.
    #[error("invalid id")]
    InvalidId,

    /// The inbound body could not be read or is not usable JSON.
    #[error("malformed request body: {0}")]
    Body(String),

    /// The upstream call failed.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::InvalidId => StatusCode::BAD_REQUEST,
            ProxyError::Body(_) | ProxyError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The text shown to the caller. Causes are never exposed.
    pub fn public_message(&self) -> &'static str {
        match self {
            ProxyError::InvalidId => INVALID_ID,
            ProxyError::Body(_) | ProxyError::Upstream(_) => FAILED_TO_CALL_SERVER,
        }
    }
}

impl From<serde_json::Error> for ProxyError {
    fn from(e: serde_json::Error) -> Self {
        ProxyError::Body(e.to_string())
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), Json(Envelope::failure(self.public_message()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ProxyError::InvalidId.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ProxyError::InvalidId.public_message(), "Invalid ID");

        let upstream = ProxyError::from(UpstreamError::Status(StatusCode::NOT_FOUND));
        assert_eq!(upstream.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(upstream.public_message(), "Failed to call the server");

        let body = ProxyError::from(serde_json::from_str::<serde_json::Value>("{").unwrap_err());
        assert_eq!(body.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.public_message(), "Failed to call the server");
    }

    #[test]
    fn test_upstream_cause_in_display_only() {
        let err = ProxyError::from(UpstreamError::Status(StatusCode::SERVICE_UNAVAILABLE));
        assert_eq!(err.to_string(), "upstream returned status 503 Service Unavailable");
        assert_eq!(err.public_message(), FAILED_TO_CALL_SERVER);
    }
}
