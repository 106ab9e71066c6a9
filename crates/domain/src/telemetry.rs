//! Telemetry: the sensor-only snapshot pulled by the periodic publisher.

use serde::{Deserialize, Serialize};

use crate::id::{AreaId, DeviceId};
use crate::state::Status;

pub const SNAPSHOT_MESSAGE: &str = "Sensor data retrieved successfully for all areas";

/// Sensor readings for every area, in registry order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: Status,
    pub message: String,
    pub areas: Vec<AreaSnapshot>,
}

impl Snapshot {
    #[must_use]
    pub fn new(areas: Vec<AreaSnapshot>) -> Self {
        Self {
            status: Status::Success,
            message: SNAPSHOT_MESSAGE.to_string(),
            areas,
        }
    }

    /// Total number of sensor reports across all areas.
    #[must_use]
    pub fn sensor_count(&self) -> usize {
        self.areas.iter().map(|a| a.sensors.len()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaSnapshot {
    #[serde(rename = "areaId")]
    pub area_id: AreaId,
    pub sensors: Vec<SensorReport>,
}

/// One sensor's reading, or the reason it could not be read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    #[serde(rename = "deviceId")]
    pub device_id: DeviceId,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_celsius: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity_percent: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motion_detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SensorReport {
    #[must_use]
    pub fn climate(
        device_id: DeviceId,
        sensor_type: &str,
        temperature_celsius: f32,
        humidity_percent: f32,
    ) -> Self {
        Self {
            temperature_celsius: Some(temperature_celsius),
            humidity_percent: Some(humidity_percent),
            ..Self::empty(device_id, sensor_type, Status::Success)
        }
    }

    #[must_use]
    pub fn motion(device_id: DeviceId, sensor_type: &str, detected: bool) -> Self {
        Self {
            motion_detected: Some(detected),
            ..Self::empty(device_id, sensor_type, Status::Success)
        }
    }

    #[must_use]
    pub fn failed(device_id: DeviceId, sensor_type: &str, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::empty(device_id, sensor_type, Status::Error)
        }
    }

    fn empty(device_id: DeviceId, sensor_type: &str, status: Status) -> Self {
        Self {
            device_id,
            sensor_type: sensor_type.to_string(),
            status,
            temperature_celsius: None,
            humidity_percent: None,
            motion_detected: None,
            message: None,
        }
    }
}
