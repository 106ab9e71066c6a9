//! Actuation: drives lines and PWM channels, reads sensors.
//!
//! Every write validates its inputs before touching hardware, so a rejected
//! request leaves both the board and [`RuntimeState`] untouched.

use std::collections::HashMap;

use iocontrol_domain::device::{DeviceType, Line, PwmChannel};
use iocontrol_domain::error::{ControlError, HardwareError, PwmError, SensorError};
use iocontrol_domain::level::Percent;

use crate::ports::{ClimateReading, ClimateSensor, Hardware};
use crate::services::registry::Registry;
use crate::services::runtime_state::RuntimeState;

/// Owns the hardware handle, the started climate drivers and the runtime state.
pub struct Actuator<H: Hardware> {
    hardware: H,
    resolution_bits: u8,
    climate_sensors: HashMap<Line, H::ClimateSensor>,
    state: RuntimeState,
}

impl<H: Hardware> Actuator<H> {
    #[must_use]
    pub fn new(hardware: H, resolution_bits: u8) -> Self {
        Self {
            hardware,
            resolution_bits,
            climate_sensors: HashMap::new(),
            state: RuntimeState::default(),
        }
    }

    pub(crate) fn hardware_mut(&mut self) -> &mut H {
        &mut self.hardware
    }

    #[must_use]
    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    #[must_use]
    pub fn resolution_bits(&self) -> u8 {
        self.resolution_bits
    }

    /// Keep a started climate driver for later reads on `line`.
    pub(crate) fn install_climate_sensor(&mut self, line: Line, sensor: H::ClimateSensor) {
        self.climate_sensors.insert(line, sensor);
    }

    /// Drive a digital line HIGH (`on`) or LOW.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Actuation`] when the hardware refuses the write.
    pub fn set_digital(&mut self, line: Line, on: bool) -> Result<(), ControlError> {
        self.hardware
            .write_digital(line, on)
            .inspect_err(|err| tracing::error!(error = %err, "digital write failed"))?;
        self.state.record_digital(line, on);
        tracing::debug!(%line, on, "digital line written");
        Ok(())
    }

    /// Set a fan's speed as a percentage of full duty.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidRange` command error outside `0..=100`,
    /// [`PwmError::NotConfigured`] when no fan with a channel sits on `line`,
    /// or [`ControlError::Actuation`] on a hardware fault.
    pub fn set_fan_speed(
        &mut self,
        registry: &Registry,
        line: Line,
        percent: i64,
    ) -> Result<Percent, ControlError> {
        self.set_level(registry, DeviceType::Fan, line, percent)
    }

    /// Set a light's brightness as a percentage of full duty.
    ///
    /// # Errors
    ///
    /// Same as [`Actuator::set_fan_speed`], matching lights instead of fans.
    pub fn set_brightness(
        &mut self,
        registry: &Registry,
        line: Line,
        percent: i64,
    ) -> Result<Percent, ControlError> {
        self.set_level(registry, DeviceType::Light, line, percent)
    }

    fn set_level(
        &mut self,
        registry: &Registry,
        device_type: DeviceType,
        line: Line,
        percent: i64,
    ) -> Result<Percent, ControlError> {
        let level = Percent::new(percent)?;
        let channel = registry
            .pwm_channel_for(device_type, line)
            .ok_or(PwmError::NotConfigured { line })?;
        self.write_level(channel, line, level)?;
        tracing::debug!(%line, %channel, %level, device_type = %device_type, "level applied");
        Ok(level)
    }

    fn write_level(
        &mut self,
        channel: PwmChannel,
        line: Line,
        level: Percent,
    ) -> Result<(), HardwareError> {
        let duty = level.to_duty(self.resolution_bits);
        self.hardware
            .write_duty(channel, duty)
            .inspect_err(|err| tracing::error!(%channel, duty, error = %err, "duty write failed"))?;
        self.state.record_level(line, level);
        tracing::trace!(%line, %channel, duty, "duty written");
        Ok(())
    }

    /// Read the climate driver started for `line`.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::DriverMissing`] when no driver was started on
    /// `line` and [`SensorError::ReadFailed`] when the sample contains NaN.
    pub fn read_temperature_humidity(&mut self, line: Line) -> Result<ClimateReading, SensorError> {
        let sensor = self
            .climate_sensors
            .get_mut(&line)
            .ok_or(SensorError::DriverMissing { line })?;
        let reading = sensor.read();
        if reading.is_valid() {
            Ok(reading)
        } else {
            tracing::warn!(%line, "climate sensor returned an invalid sample");
            Err(SensorError::ReadFailed { line })
        }
    }

    /// Whether motion is currently detected on `line`.
    pub fn read_motion(&mut self, line: Line) -> bool {
        self.hardware.read_digital(line)
    }
}
