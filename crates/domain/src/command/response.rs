//! Response records returned for every dispatched command.

use serde::{Deserialize, Serialize};

use crate::error::ControlError;
use crate::level::Percent;
use crate::state::{PowerState, Status};

/// Top-level result of one command document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: Status,
    pub message: String,
    /// Absent when the envelope itself was rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devices: Option<Vec<DeviceResult>>,
}

impl CommandResponse {
    /// Envelope-level rejection: no per-device entries are produced.
    #[must_use]
    pub fn rejected(err: &ControlError) -> Self {
        Self {
            status: Status::Error,
            message: err.to_string(),
            devices: None,
        }
    }

    /// The envelope was valid; every device entry was attempted.
    #[must_use]
    pub fn processed(devices: Vec<DeviceResult>) -> Self {
        Self {
            status: Status::Success,
            message: format!("Processed {} device command(s)", devices.len()),
            devices: Some(devices),
        }
    }
}

/// Result of one device entry within a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceResult {
    /// Echo of the entry's `deviceId`; `null` when the entry carried none.
    #[serde(rename = "deviceId")]
    pub device_id: Option<String>,
    pub status: Status,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<PowerState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fan_speed: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_celsius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_detected: Option<bool>,
}

impl DeviceResult {
    #[must_use]
    pub fn success(device_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Some(device_id.into()), Status::Success, message.into())
    }

    #[must_use]
    pub fn failure(device_id: Option<String>, err: &ControlError) -> Self {
        Self::new(device_id, Status::Error, err.to_string())
    }

    fn new(device_id: Option<String>, status: Status, message: String) -> Self {
        Self {
            device_id,
            status,
            message,
            power_state: None,
            fan_speed: None,
            brightness: None,
            temperature_celsius: None,
            humidity_percent: None,
            motion_detected: None,
        }
    }

    #[must_use]
    pub fn with_fan_speed(mut self, level: Percent) -> Self {
        self.fan_speed = Some(level);
        self.power_state = Some(PowerState::from_level(level));
        self
    }

    #[must_use]
    pub fn with_brightness(mut self, level: Percent) -> Self {
        self.brightness = Some(level);
        self.power_state = Some(PowerState::from_level(level));
        self
    }

    #[must_use]
    pub fn with_climate(mut self, temperature_celsius: f32, humidity_percent: f32) -> Self {
        self.temperature_celsius = Some(temperature_celsius);
        self.humidity_percent = Some(humidity_percent);
        self
    }

    #[must_use]
    pub fn with_motion(mut self, detected: bool) -> Self {
        self.motion_detected = Some(detected);
        self
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
