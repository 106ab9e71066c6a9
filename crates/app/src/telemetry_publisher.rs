//! Periodic telemetry publisher backed by a tokio interval task.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use iocontrol_domain::error::ControlError;
use iocontrol_domain::telemetry::Snapshot;

use crate::ports::{Hardware, TelemetrySink};
use crate::services::telemetry::TelemetryAggregator;

/// Takes a snapshot on every tick and hands it to a [`TelemetrySink`].
///
/// A failed publish is logged and the next tick proceeds normally.
pub struct TelemetryPublisher<H: Hardware, S> {
    aggregator: Arc<TelemetryAggregator<H>>,
    sink: S,
    interval: Duration,
}

impl<H, S> TelemetryPublisher<H, S>
where
    H: Hardware + 'static,
    S: TelemetrySink + 'static,
{
    #[must_use]
    pub fn new(aggregator: Arc<TelemetryAggregator<H>>, sink: S, interval: Duration) -> Self {
        Self {
            aggregator,
            sink,
            interval,
        }
    }

    /// Spawn the publishing loop. The first snapshot goes out immediately.
    pub fn start(self) -> JoinHandle<()> {
        tracing::info!(interval = ?self.interval, "telemetry publisher started");
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Err(err) = self.publish_once().await {
                tracing::warn!(error = %err, "telemetry publish failed");
            }
        }
    }

    /// Take one snapshot and forward it.
    ///
    /// # Errors
    ///
    /// Propagates the sink's error.
    pub async fn publish_once(&self) -> Result<(), ControlError> {
        let snapshot = self.aggregator.snapshot();
        self.sink.publish(&snapshot).await
    }
}

/// Sink that writes each snapshot to the log as JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn publish(&self, snapshot: &Snapshot) -> impl Future<Output = Result<(), ControlError>> + Send {
        let result = serde_json::to_string(snapshot)
            .map(|payload| {
                tracing::info!(sensors = snapshot.sensor_count(), %payload, "telemetry snapshot");
            })
            .map_err(|err| ControlError::Transport(Box::new(err)));
        async { result }
    }
}
