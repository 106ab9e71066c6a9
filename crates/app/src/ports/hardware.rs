//! Hardware port: the physical effects the control plane can request.
//!
//! Hardware calls are fast and bounded, so the port is synchronous: the
//! control plane invokes it while holding its lock.

use iocontrol_domain::device::{Direction, Line, PwmChannel};
use iocontrol_domain::error::HardwareError;

/// One temperature/humidity sample. Either field may be NaN when the
/// sensor did not answer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub temperature_celsius: f32,
    pub humidity_percent: f32,
}

impl ClimateReading {
    /// A reading is usable only when both fields are numbers.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.temperature_celsius.is_nan() && !self.humidity_percent.is_nan()
    }
}

/// A started temperature/humidity driver, owned by the control plane and
/// keyed by the line it was created for.
pub trait ClimateSensor: Send {
    fn read(&mut self) -> ClimateReading;
}

/// Board-level access to lines, PWM channels and sensor drivers.
pub trait Hardware: Send {
    type ClimateSensor: ClimateSensor;

    /// Set the electrical mode of a plain digital line.
    fn configure_line(&mut self, line: Line, direction: Direction) -> Result<(), HardwareError>;

    /// Set up `channel` with the given carrier and resolution and route it to `line`.
    fn attach_pwm(
        &mut self,
        channel: PwmChannel,
        line: Line,
        frequency_hz: u32,
        resolution_bits: u8,
    ) -> Result<(), HardwareError>;

    /// Write a raw duty value to a previously attached channel.
    fn write_duty(&mut self, channel: PwmChannel, duty: u32) -> Result<(), HardwareError>;

    fn write_digital(&mut self, line: Line, high: bool) -> Result<(), HardwareError>;

    /// Instantaneous level of a line; `true` is HIGH.
    fn read_digital(&mut self, line: Line) -> bool;

    /// Create and start a temperature/humidity driver on `line`.
    fn start_climate_sensor(&mut self, line: Line) -> Result<Self::ClimateSensor, HardwareError>;
}
