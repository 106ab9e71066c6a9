//! Shared application state for axum handlers.

use std::sync::Arc;

use iocontrol_app::ports::Hardware;
use iocontrol_app::services::control_plane::SharedControlPlane;
use iocontrol_app::services::dispatcher::CommandDispatcher;
use iocontrol_app::services::telemetry::TelemetryAggregator;

/// Application state shared across all axum handlers.
///
/// Generic over the hardware port to avoid dynamic dispatch.
/// `Clone` is implemented manually so `H` itself does not need to be
/// `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<H: Hardware> {
    /// Interprets command documents.
    pub dispatcher: Arc<CommandDispatcher<H>>,
    /// Produces sensor snapshots.
    pub telemetry: Arc<TelemetryAggregator<H>>,
}

impl<H: Hardware> Clone for AppState<H> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: Arc::clone(&self.dispatcher),
            telemetry: Arc::clone(&self.telemetry),
        }
    }
}

impl<H: Hardware + 'static> AppState<H> {
    /// Build both services over the same control plane.
    #[must_use]
    pub fn new(plane: &SharedControlPlane<H>) -> Self {
        Self {
            dispatcher: Arc::new(CommandDispatcher::new(plane.clone())),
            telemetry: Arc::new(TelemetryAggregator::new(plane.clone())),
        }
    }

    /// Create the state from pre-wrapped `Arc` services.
    ///
    /// Use this when the aggregator is shared with the telemetry publisher
    /// before constructing the HTTP state.
    #[must_use]
    pub fn from_arcs(
        dispatcher: Arc<CommandDispatcher<H>>,
        telemetry: Arc<TelemetryAggregator<H>>,
    ) -> Self {
        Self {
            dispatcher,
            telemetry,
        }
    }
}
