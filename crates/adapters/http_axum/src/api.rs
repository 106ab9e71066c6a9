//! JSON API handler modules.

pub mod commands;
pub mod sensors;

use axum::Router;
use axum::routing::{get, post};

use iocontrol_app::ports::Hardware;

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<H: Hardware + 'static>() -> Router<AppState<H>> {
    Router::new()
        .route("/command/send", post(commands::send::<H>))
        .route("/sensors", get(sensors::snapshot::<H>))
}
