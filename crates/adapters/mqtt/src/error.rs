//! MQTT adapter error types.

use iocontrol_domain::error::ControlError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// `connect` has not been called yet.
    #[error("MQTT client not connected")]
    NotConnected,

    /// The rumqttc client returned an error.
    #[error("MQTT client error")]
    Client(#[source] rumqttc::ClientError),

    /// The snapshot could not be encoded as JSON.
    #[error("failed to serialize telemetry payload")]
    Serialize(#[source] serde_json::Error),
}

impl MqttError {
    /// Convert into a [`ControlError::Transport`] for propagation across port
    /// boundaries.
    #[must_use]
    pub fn into_domain(self) -> ControlError {
        ControlError::Transport(Box::new(self))
    }
}

impl From<MqttError> for ControlError {
    fn from(err: MqttError) -> Self {
        err.into_domain()
    }
}
