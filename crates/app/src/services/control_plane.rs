//! Control plane: registry, PWM allocator and actuator behind one owner.
//!
//! [`SharedControlPlane`] is the only handle handed to request handlers and
//! the telemetry task; every access goes through its single mutex.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use iocontrol_domain::device::{DeviceDeclaration, DeviceEntry, DeviceType, Line};
use iocontrol_domain::error::{ControlError, NotFoundError, PwmError, SensorError};
use iocontrol_domain::id::{AreaId, DeviceId};
use iocontrol_domain::level::Percent;

use crate::ports::{ClimateReading, Hardware};
use crate::services::actuation::Actuator;
use crate::services::pwm_allocator::{DEFAULT_CAPACITY, PwmAllocator};
use crate::services::registry::Registry;
use crate::services::runtime_state::RuntimeState;

/// Board-wide PWM parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmSettings {
    pub channels: u8,
    pub resolution_bits: u8,
}

impl Default for PwmSettings {
    fn default() -> Self {
        Self {
            channels: DEFAULT_CAPACITY,
            resolution_bits: 8,
        }
    }
}

pub struct ControlPlane<H: Hardware> {
    registry: Registry,
    allocator: PwmAllocator,
    actuator: Actuator<H>,
}

impl<H: Hardware> ControlPlane<H> {
    #[must_use]
    pub fn new(hardware: H, settings: PwmSettings) -> Self {
        Self {
            registry: Registry::new(),
            allocator: PwmAllocator::new(settings.channels),
            actuator: Actuator::new(hardware, settings.resolution_bits),
        }
    }

    /// Register a device and bring up its hardware.
    ///
    /// Fans and lights get the next PWM channel, attached at their carrier
    /// frequency with duty 0. Temperature/humidity sensors get a started
    /// driver. Everything else has its line mode configured.
    ///
    /// The device is registered even when bring-up fails; it then carries
    /// no PWM channel (or no driver) and later actuation reports that.
    /// Re-declaring an id replaces the entry; the old channel is not reclaimed.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::Pwm`] when channels are exhausted, or
    /// [`ControlError::Actuation`] when the hardware refuses the setup.
    #[tracing::instrument(skip(self, declaration), fields(area_id = %declaration.area_id, device_id = %declaration.device_id))]
    pub fn declare(&mut self, declaration: DeviceDeclaration) -> Result<DeviceEntry, ControlError> {
        let DeviceDeclaration {
            area_id,
            device_id,
            line,
            direction,
            device_type,
        } = declaration;
        let mut entry = DeviceEntry {
            device_id,
            line,
            direction,
            device_type,
            pwm_channel: None,
        };
        let outcome = self.bring_up(&mut entry);

        if let Some(previous) = self.registry.insert(area_id, entry.clone()) {
            tracing::warn!(
                previous_line = %previous.line,
                previous_channel = ?previous.pwm_channel,
                "device re-declared, previous entry replaced"
            );
        }
        match outcome {
            Ok(()) => {
                tracing::info!(%line, device_type = %device_type, channel = ?entry.pwm_channel, "device declared");
                Ok(entry)
            }
            Err(err) => {
                tracing::warn!(%line, device_type = %device_type, error = %err, "device declared without hardware");
                Err(err)
            }
        }
    }

    fn bring_up(&mut self, entry: &mut DeviceEntry) -> Result<(), ControlError> {
        let line = entry.line;
        if entry.device_type.requires_pwm() {
            let frequency_hz = entry
                .device_type
                .pwm_frequency_hz()
                .ok_or(PwmError::NotConfigured { line })?;
            let channel = self.allocator.allocate()?;
            let resolution_bits = self.actuator.resolution_bits();
            let hardware = self.actuator.hardware_mut();
            hardware.attach_pwm(channel, line, frequency_hz, resolution_bits)?;
            entry.pwm_channel = Some(channel);
            hardware.write_duty(channel, 0)?;
        } else if entry.device_type == DeviceType::TemperatureHumiditySensor {
            let sensor = self.actuator.hardware_mut().start_climate_sensor(line)?;
            self.actuator.install_climate_sensor(line, sensor);
        } else {
            self.actuator
                .hardware_mut()
                .configure_line(line, entry.direction)?;
        }
        Ok(())
    }

    /// Copy of the entry for a declared device.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError`] for an unknown area or device.
    pub fn resolve(
        &self,
        area_id: &AreaId,
        device_id: &DeviceId,
    ) -> Result<DeviceEntry, NotFoundError> {
        self.registry.resolve(area_id, device_id).cloned()
    }

    #[must_use]
    pub fn type_of(&self, area_id: &AreaId, device_id: &DeviceId) -> DeviceType {
        self.registry.type_of(area_id, device_id)
    }

    #[must_use]
    pub fn contains_area(&self, area_id: &AreaId) -> bool {
        self.registry.contains_area(area_id)
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn allocator(&self) -> &PwmAllocator {
        &self.allocator
    }

    #[must_use]
    pub fn runtime(&self) -> &RuntimeState {
        self.actuator.state()
    }

    /// # Errors
    ///
    /// See [`Actuator::set_digital`].
    pub fn set_digital(&mut self, line: Line, on: bool) -> Result<(), ControlError> {
        self.actuator.set_digital(line, on)
    }

    /// # Errors
    ///
    /// See [`Actuator::set_fan_speed`].
    pub fn set_fan_speed(&mut self, line: Line, percent: i64) -> Result<Percent, ControlError> {
        self.actuator.set_fan_speed(&self.registry, line, percent)
    }

    /// # Errors
    ///
    /// See [`Actuator::set_brightness`].
    pub fn set_brightness(&mut self, line: Line, percent: i64) -> Result<Percent, ControlError> {
        self.actuator.set_brightness(&self.registry, line, percent)
    }

    /// # Errors
    ///
    /// See [`Actuator::read_temperature_humidity`].
    pub fn read_temperature_humidity(&mut self, line: Line) -> Result<ClimateReading, SensorError> {
        self.actuator.read_temperature_humidity(line)
    }

    pub fn read_motion(&mut self, line: Line) -> bool {
        self.actuator.read_motion(line)
    }
}

/// Cloneable handle serializing all access to one [`ControlPlane`].
pub struct SharedControlPlane<H: Hardware> {
    inner: Arc<Mutex<ControlPlane<H>>>,
}

impl<H: Hardware> SharedControlPlane<H> {
    #[must_use]
    pub fn new(plane: ControlPlane<H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(plane)),
        }
    }

    /// Acquire exclusive access. A panic in a previous holder does not
    /// poison the plane for everyone else.
    pub fn lock(&self) -> MutexGuard<'_, ControlPlane<H>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<H: Hardware> Clone for SharedControlPlane<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::dispatcher::CommandDispatcher;
    use crate::services::telemetry::TelemetryAggregator;
    use crate::test_support::FakeBoard;
    use iocontrol_domain::device::{Direction, PwmChannel};
    use iocontrol_domain::error::ErrorKind;
    use serde_json::json;

    fn declaration(area: &str, device: &str, line: u8, device_type: DeviceType) -> DeviceDeclaration {
        DeviceDeclaration::builder()
            .area_id(area)
            .device_id(device)
            .line(line)
            .device_type(device_type)
            .build()
            .unwrap()
    }

    fn plane() -> (FakeBoard, ControlPlane<FakeBoard>) {
        let board = FakeBoard::default();
        (board.clone(), ControlPlane::new(board, PwmSettings::default()))
    }

    #[test]
    fn should_attach_fan_at_fan_frequency_with_zero_duty() {
        let (board, mut plane) = plane();

        let entry = plane
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap();

        assert_eq!(entry.pwm_channel, Some(PwmChannel::new(0)));
        let state = board.state();
        assert_eq!(
            state.bindings.get(&PwmChannel::new(0)),
            Some(&(Line::new(5), 25_000, 8))
        );
        assert_eq!(state.duties.get(&PwmChannel::new(0)), Some(&0));
    }

    #[test]
    fn should_allocate_channels_in_declaration_order() {
        let (board, mut plane) = plane();
        plane
            .declare(declaration("zoneA", "led1", 18, DeviceType::Light))
            .unwrap();
        plane
            .declare(declaration("zoneA", "pir1", 34, DeviceType::MotionSensor))
            .unwrap();
        let fan = plane
            .declare(declaration("zoneB", "fan1", 5, DeviceType::Fan))
            .unwrap();

        assert_eq!(fan.pwm_channel, Some(PwmChannel::new(1)));
        assert_eq!(
            board.state().bindings.get(&PwmChannel::new(0)),
            Some(&(Line::new(18), 5_000, 8))
        );
        assert_eq!(
            board.state().modes.get(&Line::new(34)),
            Some(&Direction::Input)
        );
        assert_eq!(plane.allocator().allocated(), 2);
    }

    #[test]
    fn should_register_device_without_channel_when_exhausted() {
        let board = FakeBoard::default();
        let mut plane = ControlPlane::new(
            board,
            PwmSettings {
                channels: 1,
                resolution_bits: 8,
            },
        );
        plane
            .declare(declaration("zoneA", "led1", 18, DeviceType::Light))
            .unwrap();

        let err = plane
            .declare(declaration("zoneA", "led2", 19, DeviceType::Light))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PwmChannelsExhausted);

        let area = AreaId::new("zoneA").unwrap();
        let led2 = DeviceId::new("led2").unwrap();
        let entry = plane.resolve(&area, &led2).unwrap();
        assert_eq!(entry.pwm_channel, None);
        assert_eq!(plane.type_of(&area, &led2), DeviceType::Light);

        let err = plane.set_brightness(Line::new(19), 50).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotConfiguredForPwm);
    }

    #[test]
    fn should_drive_bound_channel_when_exhausted_device_shares_its_line() {
        let board = FakeBoard::default();
        let mut plane = ControlPlane::new(
            board.clone(),
            PwmSettings {
                channels: 1,
                resolution_bits: 8,
            },
        );
        let bound = plane
            .declare(declaration("zoneB", "fan1", 5, DeviceType::Fan))
            .unwrap();
        assert_eq!(bound.pwm_channel, Some(PwmChannel::new(0)));
        let err = plane
            .declare(declaration("zoneA", "fan2", 5, DeviceType::Fan))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PwmChannelsExhausted);

        let level = plane.set_fan_speed(Line::new(5), 40).unwrap();

        assert_eq!(level.value(), 40);
        assert_eq!(board.duty_on_line(Line::new(5)), Some(102));
    }

    #[test]
    fn should_allocate_fresh_channel_on_redeclaration() {
        let (_board, mut plane) = plane();
        plane
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap();
        let entry = plane
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap();

        assert_eq!(entry.pwm_channel, Some(PwmChannel::new(1)));
        assert_eq!(plane.registry().len(), 1);
        assert_eq!(plane.allocator().allocated(), 2);
    }

    #[test]
    fn should_start_climate_driver_for_temperature_sensor() {
        let (_board, mut plane) = plane();
        let entry = plane
            .declare(declaration("zoneB", "dht1", 4, DeviceType::TemperatureHumiditySensor))
            .unwrap();

        assert_eq!(entry.pwm_channel, None);
        assert_eq!(entry.direction, Direction::Input);
        assert!(plane.read_temperature_humidity(Line::new(4)).is_ok());
    }

    #[test]
    fn should_keep_device_registered_when_attach_fails() {
        let (board, mut plane) = plane();
        board.state().faulty.insert(Line::new(5));

        let err = plane
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ActuationFailure);
        let entry = plane
            .resolve(&AreaId::new("zoneA").unwrap(), &DeviceId::new("fan1").unwrap())
            .unwrap();
        assert_eq!(entry.pwm_channel, None);
    }

    #[test]
    fn should_apply_fan_speed_to_declared_line() {
        let (board, mut plane) = plane();
        plane
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap();

        let level = plane.set_fan_speed(Line::new(5), 70).unwrap();

        assert_eq!(level.value(), 70);
        assert_eq!(board.duty_on_line(Line::new(5)), Some(178));
        assert_eq!(plane.runtime().current_level(Line::new(5)), Some(level));
    }

    #[test]
    fn should_share_one_plane_between_clones() {
        let (_board, plane) = plane();
        let shared = SharedControlPlane::new(plane);
        let other = shared.clone();

        shared
            .lock()
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap();

        assert!(other.lock().contains_area(&AreaId::new("zoneA").unwrap()));
    }

    #[test]
    fn should_keep_every_level_update_under_concurrent_commands() {
        const THREADS: usize = 4;
        const COMMANDS_PER_THREAD: usize = 25;

        let (board, mut plane) = plane();
        plane
            .declare(declaration("zoneA", "fan1", 5, DeviceType::Fan))
            .unwrap();
        plane
            .declare(declaration("zoneA", "dht1", 4, DeviceType::TemperatureHumiditySensor))
            .unwrap();
        let shared = SharedControlPlane::new(plane);
        let dispatcher = CommandDispatcher::new(shared.clone());
        let aggregator = TelemetryAggregator::new(shared.clone());
        let writes_before = board.state().duty_writes;

        std::thread::scope(|scope| {
            for worker in 0..THREADS {
                let dispatcher = &dispatcher;
                scope.spawn(move || {
                    for i in 0..COMMANDS_PER_THREAD {
                        let speed = 1 + (worker * COMMANDS_PER_THREAD + i) % 100;
                        let response = dispatcher.dispatch(&json!({
                            "areaId": "zoneA",
                            "devices": [{
                                "deviceId": "fan1",
                                "function": "setspeed",
                                "parameters": { "speed": speed }
                            }]
                        }));
                        let devices = response.devices.unwrap();
                        assert!(devices[0].is_success());
                    }
                });
            }
            let aggregator = &aggregator;
            scope.spawn(move || {
                for _ in 0..COMMANDS_PER_THREAD {
                    assert_eq!(aggregator.snapshot().sensor_count(), 1);
                }
            });
        });

        assert_eq!(
            board.state().duty_writes - writes_before,
            THREADS * COMMANDS_PER_THREAD
        );
        let plane = shared.lock();
        let current = plane.runtime().current_level(Line::new(5)).unwrap();
        assert_eq!(board.duty_on_line(Line::new(5)), Some(current.to_duty(8)));
        let last_active = plane.runtime().last_active_level(Line::new(5)).unwrap();
        assert_eq!(last_active, current);
        assert!((1..=100).contains(&last_active.value()));
    }
}
