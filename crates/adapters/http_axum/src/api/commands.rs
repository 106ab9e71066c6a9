//! JSON handler for command documents.

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use iocontrol_app::ports::Hardware;
use iocontrol_domain::command::CommandResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// Possible responses from the send endpoint.
pub enum SendResponse {
    /// The dispatcher's record, rejected envelopes included.
    Ok(Json<CommandResponse>),
}

impl IntoResponse for SendResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// `POST /api/command/send`
///
/// The body is read raw so that any JSON value reaches the dispatcher,
/// which owns envelope validation.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] when the body is not valid JSON.
pub async fn send<H>(
    State(state): State<AppState<H>>,
    body: Bytes,
) -> Result<SendResponse, ApiError>
where
    H: Hardware + 'static,
{
    let command: Value = serde_json::from_slice(&body).map_err(ApiError::Parse)?;
    let response = state.dispatcher.dispatch(&command);
    Ok(SendResponse::Ok(Json(response)))
}
