//! Telemetry port: forwards snapshots produced on a timer.

use std::future::Future;

use iocontrol_domain::error::ControlError;
use iocontrol_domain::telemetry::Snapshot;

/// Destination of periodic telemetry snapshots (message bus, log, …).
pub trait TelemetrySink: Send + Sync {
    /// Deliver one snapshot.
    fn publish(&self, snapshot: &Snapshot) -> impl Future<Output = Result<(), ControlError>> + Send;
}

impl<T: TelemetrySink> TelemetrySink for std::sync::Arc<T> {
    fn publish(&self, snapshot: &Snapshot) -> impl Future<Output = Result<(), ControlError>> + Send {
        (**self).publish(snapshot)
    }
}
