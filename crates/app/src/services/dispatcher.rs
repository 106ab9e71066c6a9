//! Command dispatcher: interprets one command document against the control plane.
//!
//! Envelope problems reject the whole command. Everything after the envelope
//! is scoped to a single device entry, so one bad entry never hides the
//! results of its siblings.

use serde_json::Value;

use iocontrol_domain::command::{
    AREA_ID_FIELD, CommandResponse, DEVICE_ID_FIELD, DEVICES_FIELD, DeviceResult, FUNCTION_FIELD,
    Function, PARAMETERS_FIELD,
};
use iocontrol_domain::device::{DeviceType, Line};
use iocontrol_domain::error::{CommandError, ControlError, NotFoundError};
use iocontrol_domain::id::{AreaId, DeviceId};
use iocontrol_domain::state::PowerState;

use crate::ports::Hardware;
use crate::services::control_plane::SharedControlPlane;
use crate::services::runtime_state::RuntimeState;

pub struct CommandDispatcher<H: Hardware> {
    plane: SharedControlPlane<H>,
}

impl<H: Hardware> CommandDispatcher<H> {
    #[must_use]
    pub fn new(plane: SharedControlPlane<H>) -> Self {
        Self { plane }
    }

    #[must_use]
    pub fn plane(&self) -> &SharedControlPlane<H> {
        &self.plane
    }

    /// Run every device entry of `command` and collect one result per entry,
    /// in input order.
    ///
    /// Never fails: envelope errors come back as a rejected response.
    #[tracing::instrument(skip_all)]
    pub fn dispatch(&self, command: &Value) -> CommandResponse {
        let (area_id, entries) = match self.accept(command) {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(error = %err, "command rejected");
                return CommandResponse::rejected(&err);
            }
        };

        let results: Vec<DeviceResult> = entries
            .iter()
            .map(|entry| self.dispatch_entry(&area_id, entry))
            .collect();
        let failed = results.iter().filter(|r| !r.is_success()).count();
        tracing::info!(%area_id, devices = results.len(), failed, "command processed");
        CommandResponse::processed(results)
    }

    fn accept<'a>(&self, command: &'a Value) -> Result<(AreaId, &'a [Value]), ControlError> {
        let area_id = command
            .get(AREA_ID_FIELD)
            .and_then(Value::as_str)
            .and_then(|raw| AreaId::new(raw).ok())
            .ok_or(CommandError::MissingAreaId)?;
        let entries = command
            .get(DEVICES_FIELD)
            .and_then(Value::as_array)
            .filter(|entries| !entries.is_empty())
            .ok_or(CommandError::MissingDevices)?;
        if !self.plane.lock().contains_area(&area_id) {
            return Err(NotFoundError::Area(area_id).into());
        }
        Ok((area_id, entries.as_slice()))
    }

    fn dispatch_entry(&self, area_id: &AreaId, entry: &Value) -> DeviceResult {
        let raw_device_id = entry.get(DEVICE_ID_FIELD).and_then(Value::as_str);
        let function_name = entry.get(FUNCTION_FIELD).and_then(Value::as_str);
        let (Some(raw_device_id), Some(function_name)) = (raw_device_id, function_name) else {
            let err = ControlError::from(CommandError::MissingDeviceFields);
            tracing::debug!(error = %err, "device entry rejected");
            return DeviceResult::failure(raw_device_id.map(String::from), &err);
        };

        let parameters = entry.get(PARAMETERS_FIELD);
        match self.execute(area_id, raw_device_id, function_name, parameters) {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!(%area_id, device_id = raw_device_id, function = function_name, error = %err, "device command failed");
                DeviceResult::failure(Some(raw_device_id.to_string()), &err)
            }
        }
    }

    fn execute(
        &self,
        area_id: &AreaId,
        raw_device_id: &str,
        function_name: &str,
        parameters: Option<&Value>,
    ) -> Result<DeviceResult, ControlError> {
        let device_id =
            DeviceId::new(raw_device_id).map_err(|_| CommandError::MissingDeviceFields)?;
        let mut plane = self.plane.lock();
        let device = plane.resolve(area_id, &device_id)?;
        let function: Function = function_name.parse()?;

        match (device.device_type, function) {
            (DeviceType::Fan, Function::Toggle) => {
                let on = bool_parameter(parameters, function)?;
                let target = toggle_target(plane.runtime(), device.line, on);
                let level = plane.set_fan_speed(device.line, target)?;
                Ok(DeviceResult::success(
                    raw_device_id,
                    format!("Fan '{device_id}' turned {}", PowerState::from_level(level)),
                )
                .with_fan_speed(level))
            }
            (DeviceType::Light, Function::Toggle) => {
                let on = bool_parameter(parameters, function)?;
                let target = toggle_target(plane.runtime(), device.line, on);
                let level = plane.set_brightness(device.line, target)?;
                Ok(DeviceResult::success(
                    raw_device_id,
                    format!("Light '{device_id}' turned {}", PowerState::from_level(level)),
                )
                .with_brightness(level))
            }
            (
                DeviceType::TemperatureHumiditySensor | DeviceType::MotionSensor | DeviceType::Other,
                Function::Toggle,
            ) => {
                let on = bool_parameter(parameters, function)?;
                plane.set_digital(device.line, on)?;
                let state = if on { PowerState::On } else { PowerState::Off };
                let mut result =
                    DeviceResult::success(raw_device_id, format!("Device '{device_id}' turned {state}"));
                result.power_state = Some(state);
                Ok(result)
            }
            (DeviceType::Fan, Function::SetSpeed) => {
                let speed = integer_parameter(parameters, function)?;
                let level = plane.set_fan_speed(device.line, speed)?;
                Ok(DeviceResult::success(
                    raw_device_id,
                    format!("Fan '{device_id}' speed set to {level}"),
                )
                .with_fan_speed(level))
            }
            (DeviceType::Light, Function::SetBrightness) => {
                let brightness = integer_parameter(parameters, function)?;
                let level = plane.set_brightness(device.line, brightness)?;
                Ok(DeviceResult::success(
                    raw_device_id,
                    format!("Light '{device_id}' brightness set to {level}"),
                )
                .with_brightness(level))
            }
            (DeviceType::TemperatureHumiditySensor, Function::GetReadings) => {
                let reading = plane.read_temperature_humidity(device.line)?;
                Ok(DeviceResult::success(
                    raw_device_id,
                    format!("Readings retrieved for '{device_id}'"),
                )
                .with_climate(reading.temperature_celsius, reading.humidity_percent))
            }
            (DeviceType::MotionSensor, Function::GetReadings) => {
                let detected = plane.read_motion(device.line);
                Ok(DeviceResult::success(
                    raw_device_id,
                    format!("Readings retrieved for '{device_id}'"),
                )
                .with_motion(detected))
            }
            (
                DeviceType::Light
                | DeviceType::TemperatureHumiditySensor
                | DeviceType::MotionSensor
                | DeviceType::Other,
                Function::SetSpeed,
            )
            | (
                DeviceType::Fan
                | DeviceType::TemperatureHumiditySensor
                | DeviceType::MotionSensor
                | DeviceType::Other,
                Function::SetBrightness,
            )
            | (DeviceType::Fan | DeviceType::Light | DeviceType::Other, Function::GetReadings) => {
                Err(CommandError::FunctionNotApplicable {
                    function,
                    device_type: device.device_type,
                }
                .into())
            }
        }
    }
}

/// Level a toggle moves to: off, or the last visible level (full power if none).
fn toggle_target(state: &RuntimeState, line: Line, on: bool) -> i64 {
    if on {
        i64::from(state.restore_level(line).value())
    } else {
        0
    }
}

fn missing_parameter(function: Function) -> CommandError {
    CommandError::MissingParameter {
        function,
        parameter: function.parameter().unwrap_or_default(),
    }
}

fn parameter(parameters: Option<&Value>, function: Function) -> Result<&Value, CommandError> {
    let name = function.parameter().unwrap_or_default();
    parameters
        .and_then(|p| p.get(name))
        .ok_or_else(|| missing_parameter(function))
}

/// Booleans, or integers where any non-zero value means `true`.
fn bool_parameter(parameters: Option<&Value>, function: Function) -> Result<bool, CommandError> {
    let value = parameter(parameters, function)?;
    value
        .as_bool()
        .or_else(|| value.as_i64().map(|n| n != 0))
        .ok_or_else(|| missing_parameter(function))
}

/// Integers, or floats with no fractional part (`50.0`).
#[allow(clippy::cast_possible_truncation)]
fn integer_parameter(parameters: Option<&Value>, function: Function) -> Result<i64, CommandError> {
    let value = parameter(parameters, function)?;
    value
        .as_i64()
        .or_else(|| {
            value
                .as_f64()
                .filter(|n| n.fract() == 0.0)
                .map(|n| n as i64)
        })
        .ok_or_else(|| missing_parameter(function))
}
