//! # iocontrol-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Accept **command documents** on `POST /api/command/send` and hand them
//!   to the command dispatcher (driving adapter)
//! - Serve the current **sensor snapshot** on `GET /api/sensors`
//! - Map undecodable bodies to `400` with a JSON error record; every decoded
//!   command answers `200` with the dispatcher's response record
//!
//! ## Dependency rule
//! Depends on `iocontrol-app` (for port traits and services) and `iocontrol-domain`
//! (for response types). Never leaks axum types into the domain.

pub mod api;
mod error;
pub mod router;
pub mod state;

pub use error::ApiError;
