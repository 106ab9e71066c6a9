//! MQTT publisher configuration.

use std::time::Duration;

use rumqttc::MqttOptions;
use serde::Deserialize;

/// Largest packet accepted or sent; snapshots of a fully populated board fit well within it.
const MAX_PACKET_SIZE: usize = 16 * 1024;

/// Configuration for the MQTT telemetry sink.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address.
    pub broker_host: String,
    /// MQTT broker port.
    pub broker_port: u16,
    /// MQTT client identifier.
    pub client_id: String,
    /// Topic every snapshot is published to.
    pub topic: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "iocontrol".to_string(),
            topic: "iocontrol/telemetry".to_string(),
            username: None,
            password: None,
            keep_alive_secs: 30,
        }
    }
}

impl MqttConfig {
    /// Connection options for `rumqttc`. Credentials are only set when both
    /// username and password are present.
    #[must_use]
    pub fn options(&self) -> MqttOptions {
        let mut options =
            MqttOptions::new(self.client_id.clone(), self.broker_host.clone(), self.broker_port);
        options.set_keep_alive(Duration::from_secs(u64::from(self.keep_alive_secs)));
        options.set_max_packet_size(MAX_PACKET_SIZE, MAX_PACKET_SIZE);
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            options.set_credentials(username, password);
        }
        options
    }
}
