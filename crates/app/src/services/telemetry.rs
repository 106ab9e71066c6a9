//! Telemetry aggregator: sensor-only snapshot of every area.

use iocontrol_domain::device::{DeviceEntry, DeviceType};
use iocontrol_domain::id::AreaId;
use iocontrol_domain::telemetry::{AreaSnapshot, SensorReport, Snapshot};

use crate::ports::Hardware;
use crate::services::control_plane::{ControlPlane, SharedControlPlane};

/// Message attached to a temperature/humidity entry whose read failed.
pub const READ_FAILURE_MESSAGE: &str = "Failed to read sensor data";

pub struct TelemetryAggregator<H: Hardware> {
    plane: SharedControlPlane<H>,
}

impl<H: Hardware> TelemetryAggregator<H> {
    #[must_use]
    pub fn new(plane: SharedControlPlane<H>) -> Self {
        Self { plane }
    }

    /// Read every sensor once. Every declared area is listed, even when it
    /// holds no sensors; non-sensor devices never appear.
    #[tracing::instrument(skip(self))]
    pub fn snapshot(&self) -> Snapshot {
        let mut guard = self.plane.lock();
        let plane: &mut ControlPlane<H> = &mut guard;
        let targets: Vec<(AreaId, Vec<DeviceEntry>)> = plane
            .registry()
            .areas()
            .map(|(area_id, devices)| {
                let sensors = devices
                    .values()
                    .filter(|entry| entry.device_type.is_sensor())
                    .cloned()
                    .collect();
                (area_id.clone(), sensors)
            })
            .collect();

        let areas: Vec<AreaSnapshot> = targets
            .into_iter()
            .map(|(area_id, sensors)| AreaSnapshot {
                sensors: sensors
                    .into_iter()
                    .filter_map(|entry| read_sensor(plane, entry))
                    .collect(),
                area_id,
            })
            .collect();
        let snapshot = Snapshot::new(areas);
        tracing::debug!(
            areas = snapshot.areas.len(),
            sensors = snapshot.sensor_count(),
            "snapshot taken"
        );
        snapshot
    }
}

fn read_sensor<H: Hardware>(plane: &mut ControlPlane<H>, entry: DeviceEntry) -> Option<SensorReport> {
    let label = entry.device_type.sensor_label()?;
    match entry.device_type {
        DeviceType::TemperatureHumiditySensor => {
            Some(match plane.read_temperature_humidity(entry.line) {
                Ok(reading) => SensorReport::climate(
                    entry.device_id,
                    label,
                    reading.temperature_celsius,
                    reading.humidity_percent,
                ),
                Err(err) => {
                    tracing::warn!(device_id = %entry.device_id, error = %err, "sensor read failed");
                    SensorReport::failed(entry.device_id, label, READ_FAILURE_MESSAGE)
                }
            })
        }
        DeviceType::MotionSensor => {
            let detected = plane.read_motion(entry.line);
            Some(SensorReport::motion(entry.device_id, label, detected))
        }
        DeviceType::Fan | DeviceType::Light | DeviceType::Other => None,
    }
}
