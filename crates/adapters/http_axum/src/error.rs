//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use iocontrol_domain::state::Status;

/// Message returned when a request body is not a JSON document.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse JSON!";

/// JSON error body, shaped like a rejected command response.
#[derive(Serialize)]
struct ErrorBody {
    status: Status,
    message: &'static str,
}

/// Failures detected before a request reaches the dispatcher.
#[derive(Debug)]
pub enum ApiError {
    /// The body could not be decoded.
    Parse(serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Parse(err) => {
                tracing::debug!(error = %err, "command body rejected");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody {
                        status: Status::Error,
                        message: PARSE_FAILURE_MESSAGE,
                    }),
                )
                    .into_response()
            }
        }
    }
}
