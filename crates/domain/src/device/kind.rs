//! Device type: the closed set of supported device kinds.

use std::fmt;

use serde::{Deserialize, Serialize};

/// PWM carrier frequency for fans, above the audible range of fan motors.
pub const FAN_PWM_FREQUENCY_HZ: u32 = 25_000;

/// PWM carrier frequency for LED dimming.
pub const LIGHT_PWM_FREQUENCY_HZ: u32 = 5_000;

/// Kind of device attached to a line. Decides which functions apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    #[serde(alias = "led")]
    Light,
    Fan,
    #[serde(alias = "dht11")]
    TemperatureHumiditySensor,
    #[serde(alias = "pir")]
    MotionSensor,
    Other,
}

impl DeviceType {
    /// Whether declaring this type consumes a PWM channel.
    #[must_use]
    pub fn requires_pwm(self) -> bool {
        matches!(self, Self::Light | Self::Fan)
    }

    /// PWM carrier frequency for PWM-bearing types.
    #[must_use]
    pub fn pwm_frequency_hz(self) -> Option<u32> {
        match self {
            Self::Fan => Some(FAN_PWM_FREQUENCY_HZ),
            Self::Light => Some(LIGHT_PWM_FREQUENCY_HZ),
            Self::TemperatureHumiditySensor | Self::MotionSensor | Self::Other => None,
        }
    }

    #[must_use]
    pub fn is_sensor(self) -> bool {
        self.sensor_label().is_some()
    }

    /// Label reported as `type` in telemetry snapshots.
    #[must_use]
    pub fn sensor_label(self) -> Option<&'static str> {
        match self {
            Self::TemperatureHumiditySensor => Some("DHT11"),
            Self::MotionSensor => Some("PIR"),
            Self::Light | Self::Fan | Self::Other => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Fan => "fan",
            Self::TemperatureHumiditySensor => "temperature_humidity_sensor",
            Self::MotionSensor => "motion_sensor",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
