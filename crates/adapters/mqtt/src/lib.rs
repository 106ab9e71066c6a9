//! # iocontrol-adapter-mqtt
//!
//! MQTT adapter: forwards telemetry snapshots to a broker.
//!
//! ## Responsibilities
//! - Connect to an MQTT broker and keep the `rumqttc` event loop running
//! - Serialize each [`Snapshot`] to JSON and publish it with QoS 1
//!
//! ## Dependency rule
//! Same as other adapters: depends on `iocontrol-app` and `iocontrol-domain`.

mod config;
mod error;

use std::future::Future;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, Packet, QoS};
use tokio::task::JoinHandle;

use iocontrol_app::ports::TelemetrySink;
use iocontrol_domain::error::ControlError;
use iocontrol_domain::telemetry::Snapshot;

pub use config::MqttConfig;
pub use error::MqttError;

/// Capacity of the request channel between the client and its event loop.
const REQUEST_CAPACITY: usize = 10;

/// [`TelemetrySink`] publishing to one MQTT topic.
pub struct MqttTelemetrySink {
    config: MqttConfig,
    client: Option<AsyncClient>,
    event_loop_task: Option<JoinHandle<()>>,
}

impl MqttTelemetrySink {
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config,
            client: None,
            event_loop_task: None,
        }
    }

    /// Create the client and spawn its event loop on the current runtime.
    ///
    /// The broker is contacted lazily by the event loop; connection failures
    /// are logged and retried there.
    pub fn connect(&mut self) {
        let (client, mut event_loop) = AsyncClient::new(self.config.options(), REQUEST_CAPACITY);
        let broker = format!("{}:{}", self.config.broker_host, self.config.broker_port);

        let task = tokio::spawn(async move {
            loop {
                match event_loop.poll().await {
                    Ok(Event::Incoming(Packet::ConnAck(_))) => {
                        tracing::info!(%broker, "connected to MQTT broker");
                    }
                    Ok(_) => {}
                    Err(err) => {
                        tracing::warn!(%broker, error = %err, "MQTT event loop error");
                        tokio::time::sleep(Duration::from_secs(1)).await;
                    }
                }
            }
        });

        self.client = Some(client);
        self.event_loop_task = Some(task);
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.config.topic
    }

    fn prepare(&self, snapshot: &Snapshot) -> Result<(AsyncClient, Vec<u8>), MqttError> {
        let client = self.client.clone().ok_or(MqttError::NotConnected)?;
        let payload = serde_json::to_vec(snapshot).map_err(MqttError::Serialize)?;
        Ok((client, payload))
    }
}

impl TelemetrySink for MqttTelemetrySink {
    fn publish(&self, snapshot: &Snapshot) -> impl Future<Output = Result<(), ControlError>> + Send {
        let prepared = self.prepare(snapshot);
        let topic = self.config.topic.clone();
        async move {
            let (client, payload) = prepared?;
            let size = payload.len();
            client
                .publish(topic.as_str(), QoS::AtLeastOnce, false, payload)
                .await
                .map_err(MqttError::Client)?;
            tracing::debug!(%topic, size, "telemetry published");
            Ok::<(), ControlError>(())
        }
    }
}

impl Drop for MqttTelemetrySink {
    fn drop(&mut self) {
        if let Some(task) = self.event_loop_task.take() {
            task.abort();
        }
    }
}
