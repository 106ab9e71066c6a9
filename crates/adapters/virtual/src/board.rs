//! Virtual board: shared simulated state behind a cloneable handle.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use iocontrol_app::ports::{ClimateReading, Hardware};
use iocontrol_domain::device::{Direction, Line, PwmChannel};
use iocontrol_domain::error::HardwareError;
use iocontrol_domain::level::max_duty;

use crate::climate::VirtualClimateSensor;

/// How a PWM channel was set up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PwmBinding {
    pub line: Line,
    pub frequency_hz: u32,
    pub resolution_bits: u8,
}

#[derive(Debug, Default)]
pub(crate) struct BoardState {
    modes: HashMap<Line, Direction>,
    bindings: HashMap<PwmChannel, PwmBinding>,
    duties: HashMap<PwmChannel, u32>,
    levels: HashMap<Line, bool>,
    pub(crate) climate: HashMap<Line, ClimateReading>,
    faulty: HashSet<Line>,
}

/// Cloneable handle to one simulated board. Clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct VirtualHardware {
    state: Arc<Mutex<BoardState>>,
}

impl VirtualHardware {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Last duty written to `channel`.
    #[must_use]
    pub fn duty(&self, channel: PwmChannel) -> Option<u32> {
        self.state().duties.get(&channel).copied()
    }

    /// Last duty written to whichever channel drives `line`.
    #[must_use]
    pub fn duty_on_line(&self, line: Line) -> Option<u32> {
        let state = self.state();
        state
            .bindings
            .iter()
            .find(|(_, binding)| binding.line == line)
            .and_then(|(channel, _)| state.duties.get(channel).copied())
    }

    #[must_use]
    pub fn pwm_binding(&self, channel: PwmChannel) -> Option<PwmBinding> {
        self.state().bindings.get(&channel).copied()
    }

    #[must_use]
    pub fn line_mode(&self, line: Line) -> Option<Direction> {
        self.state().modes.get(&line).copied()
    }

    /// Current level of a digital line, written or injected.
    #[must_use]
    pub fn digital_level(&self, line: Line) -> Option<bool> {
        self.state().levels.get(&line).copied()
    }

    /// Drive an input line from outside, e.g. a motion sensor firing.
    pub fn set_input_level(&self, line: Line, high: bool) {
        self.state().levels.insert(line, high);
    }

    /// Sample the climate sensor on `line` returns from now on. NaN fields
    /// simulate a sensor that does not answer.
    pub fn set_climate(&self, line: Line, reading: ClimateReading) {
        self.state().climate.insert(line, reading);
    }

    /// Make every write touching `line` fail until [`VirtualHardware::heal_line`].
    pub fn fail_line(&self, line: Line) {
        self.state().faulty.insert(line);
    }

    pub fn heal_line(&self, line: Line) {
        self.state().faulty.remove(&line);
    }

    fn check(state: &BoardState, line: Line) -> Result<(), HardwareError> {
        if state.faulty.contains(&line) {
            Err(HardwareError::new(line, "simulated fault"))
        } else {
            Ok(())
        }
    }
}

impl Hardware for VirtualHardware {
    type ClimateSensor = VirtualClimateSensor;

    fn configure_line(&mut self, line: Line, direction: Direction) -> Result<(), HardwareError> {
        let mut state = self.state();
        Self::check(&state, line)?;
        state.modes.insert(line, direction);
        tracing::trace!(%line, ?direction, "line configured");
        Ok(())
    }

    fn attach_pwm(
        &mut self,
        channel: PwmChannel,
        line: Line,
        frequency_hz: u32,
        resolution_bits: u8,
    ) -> Result<(), HardwareError> {
        let mut state = self.state();
        Self::check(&state, line)?;
        state.modes.insert(line, Direction::Output);
        state.bindings.insert(
            channel,
            PwmBinding {
                line,
                frequency_hz,
                resolution_bits,
            },
        );
        tracing::trace!(%channel, %line, frequency_hz, resolution_bits, "pwm attached");
        Ok(())
    }

    fn write_duty(&mut self, channel: PwmChannel, duty: u32) -> Result<(), HardwareError> {
        let mut state = self.state();
        let binding = state
            .bindings
            .get(&channel)
            .copied()
            .ok_or_else(|| HardwareError::new(Line::new(0), format!("channel {channel} not attached")))?;
        Self::check(&state, binding.line)?;
        if duty > max_duty(binding.resolution_bits) {
            return Err(HardwareError::new(
                binding.line,
                format!("duty {duty} exceeds {}-bit resolution", binding.resolution_bits),
            ));
        }
        state.duties.insert(channel, duty);
        Ok(())
    }

    fn write_digital(&mut self, line: Line, high: bool) -> Result<(), HardwareError> {
        let mut state = self.state();
        Self::check(&state, line)?;
        state.levels.insert(line, high);
        Ok(())
    }

    fn read_digital(&mut self, line: Line) -> bool {
        self.state().levels.get(&line).copied().unwrap_or(false)
    }

    fn start_climate_sensor(&mut self, line: Line) -> Result<VirtualClimateSensor, HardwareError> {
        Self::check(&self.state(), line)?;
        Ok(VirtualClimateSensor::new(self.clone(), line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_record_pwm_binding_and_duty() {
        let board = VirtualHardware::new();
        let mut hardware = board.clone();

        hardware
            .attach_pwm(PwmChannel::new(3), Line::new(5), 25_000, 8)
            .unwrap();
        hardware.write_duty(PwmChannel::new(3), 178).unwrap();

        assert_eq!(
            board.pwm_binding(PwmChannel::new(3)),
            Some(PwmBinding {
                line: Line::new(5),
                frequency_hz: 25_000,
                resolution_bits: 8,
            })
        );
        assert_eq!(board.duty(PwmChannel::new(3)), Some(178));
        assert_eq!(board.duty_on_line(Line::new(5)), Some(178));
        assert_eq!(board.line_mode(Line::new(5)), Some(Direction::Output));
    }

    #[test]
    fn should_reject_duty_on_unattached_channel() {
        let mut board = VirtualHardware::new();
        assert!(board.write_duty(PwmChannel::new(0), 10).is_err());
    }

    #[test]
    fn should_reject_duty_beyond_resolution() {
        let mut board = VirtualHardware::new();
        board
            .attach_pwm(PwmChannel::new(0), Line::new(18), 5_000, 8)
            .unwrap();

        assert!(board.write_duty(PwmChannel::new(0), 255).is_ok());
        let err = board.write_duty(PwmChannel::new(0), 256).unwrap_err();
        assert_eq!(err.line, Line::new(18));
    }

    #[test]
    fn should_read_back_injected_input() {
        let mut board = VirtualHardware::new();
        board
            .configure_line(Line::new(34), Direction::Input)
            .unwrap();
        assert!(!board.read_digital(Line::new(34)));

        board.set_input_level(Line::new(34), true);
        assert!(board.read_digital(Line::new(34)));
        assert_eq!(board.line_mode(Line::new(34)), Some(Direction::Input));
    }

    #[test]
    fn should_fail_writes_on_faulty_line_until_healed() {
        let mut board = VirtualHardware::new();
        board.fail_line(Line::new(2));

        let err = board.write_digital(Line::new(2), true).unwrap_err();
        assert_eq!(err.to_string(), "Hardware fault on line 2: simulated fault");
        assert_eq!(board.digital_level(Line::new(2)), None);

        board.heal_line(Line::new(2));
        board.write_digital(Line::new(2), true).unwrap();
        assert_eq!(board.digital_level(Line::new(2)), Some(true));
    }
}
