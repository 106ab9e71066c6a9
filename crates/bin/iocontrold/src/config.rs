//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `iocontrol.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use serde::Deserialize;

use iocontrol_adapter_mqtt::MqttConfig;
use iocontrol_app::services::control_plane::PwmSettings;
use iocontrol_domain::device::{DeviceDeclaration, DeviceType, Direction};
use iocontrol_domain::level::MAX_RESOLUTION_BITS;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Board PWM settings.
    pub hardware: HardwareConfig,
    /// Periodic telemetry settings.
    pub telemetry: TelemetryConfig,
    /// Broker settings, used when `telemetry.sink = "mqtt"`.
    pub mqtt: MqttConfig,
    /// Device topology, declared in order at startup.
    pub devices: Vec<DeviceDeclaration>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HardwareConfig {
    pub pwm_channels: u8,
    pub pwm_resolution_bits: u8,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    /// Seconds between two snapshots.
    pub interval_secs: u64,
    pub sink: SinkKind,
}

/// Where telemetry snapshots go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Log,
    Mqtt,
}

impl Config {
    /// Load configuration from `iocontrol.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("iocontrol.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("IOCONTROL_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("IOCONTROL_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("IOCONTROL_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("IOCONTROL_MQTT_HOST") {
            self.mqtt.broker_host = val;
        }
        if let Ok(val) = std::env::var("IOCONTROL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.telemetry.interval_secs == 0 {
            return Err(ConfigError::Validation(
                "telemetry interval must be non-zero".to_string(),
            ));
        }
        if !(1..=MAX_RESOLUTION_BITS).contains(&self.hardware.pwm_resolution_bits) {
            return Err(ConfigError::Validation(format!(
                "pwm resolution must be between 1 and {MAX_RESOLUTION_BITS} bits"
            )));
        }
        if self.hardware.pwm_channels == 0 {
            return Err(ConfigError::Validation(
                "at least one pwm channel is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            hardware: HardwareConfig::default(),
            telemetry: TelemetryConfig::default(),
            mqtt: MqttConfig::default(),
            devices: default_topology(),
        }
    }
}

impl HardwareConfig {
    #[must_use]
    pub fn pwm_settings(&self) -> PwmSettings {
        PwmSettings {
            channels: self.pwm_channels,
            resolution_bits: self.pwm_resolution_bits,
        }
    }
}

impl TelemetryConfig {
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 2826,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "iocontrold=info,iocontrol=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for HardwareConfig {
    fn default() -> Self {
        let settings = PwmSettings::default();
        Self {
            pwm_channels: settings.channels,
            pwm_resolution_bits: settings.resolution_bits,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: 10,
            sink: SinkKind::Log,
        }
    }
}

const LIVING_AREA: &str = "94c4dab3-19bf-448a-90d5-b9b00ec0cda0";
const UTILITY_AREA: &str = "8dca5204-a0ac-4ec6-83f7-c3b8acdf6e5b";

/// The board as shipped: two lights and a motion sensor in one area, a fan
/// and a temperature/humidity sensor in the other.
fn default_topology() -> Vec<DeviceDeclaration> {
    [
        (LIVING_AREA, "1bd59658-ba07-4520-b2c3-6cc7df314d4c", 18, Direction::Output, DeviceType::Light),
        (LIVING_AREA, "ee72372d-253b-4775-85e4-9ff851a343a0", 19, Direction::Output, DeviceType::Light),
        (LIVING_AREA, "31d0f257-2fbc-443e-8fbb-f066de81debd", 34, Direction::Input, DeviceType::MotionSensor),
        (UTILITY_AREA, "891647d0-e5a8-4f02-bfce-a17facfa6e5c", 5, Direction::Output, DeviceType::Fan),
        (UTILITY_AREA, "9e569c3f-afed-41de-9758-99a7be8ce3d7", 4, Direction::InputPullup, DeviceType::TemperatureHumiditySensor),
    ]
    .into_iter()
    .filter_map(|(area_id, device_id, line, direction, device_type)| {
        DeviceDeclaration::builder()
            .area_id(area_id)
            .device_id(device_id)
            .line(line)
            .direction(direction)
            .device_type(device_type)
            .build()
            .ok()
    })
    .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
