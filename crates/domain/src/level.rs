//! Level: a validated 0 to 100 percentage applied to a PWM-bearing device.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Widest duty register supported by the PWM peripheral.
pub const MAX_RESOLUTION_BITS: u8 = 16;

/// Fan speed or LED brightness, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Percent(u8);

impl Percent {
    pub const OFF: Self = Self(0);
    pub const FULL: Self = Self(100);

    /// Validate a raw percentage.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidRange`] when `value` is outside `0..=100`.
    pub fn new(value: i64) -> Result<Self, CommandError> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(CommandError::InvalidRange { value }),
        }
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Whether the level represents a powered device.
    #[must_use]
    pub fn is_on(self) -> bool {
        self.0 > 0
    }

    /// Map the percentage linearly onto a duty register of `resolution_bits`.
    ///
    /// 0 maps to 0 and 100 maps to the register maximum; intermediate values
    /// truncate like integer interpolation does.
    #[must_use]
    pub fn to_duty(self, resolution_bits: u8) -> u32 {
        u32::from(self.0) * max_duty(resolution_bits) / 100
    }
}

/// Largest duty value representable with `resolution_bits`.
#[must_use]
pub fn max_duty(resolution_bits: u8) -> u32 {
    let bits = resolution_bits.clamp(1, MAX_RESOLUTION_BITS);
    (1u32 << bits) - 1
}

impl TryFrom<i64> for Percent {
    type Error = CommandError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> Self {
        p.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_inclusive_bounds() {
        assert_eq!(Percent::new(0).unwrap(), Percent::OFF);
        assert_eq!(Percent::new(100).unwrap(), Percent::FULL);
    }

    #[test]
    fn should_reject_values_outside_range() {
        assert!(matches!(
            Percent::new(101),
            Err(CommandError::InvalidRange { value: 101 })
        ));
        assert!(matches!(
            Percent::new(-1),
            Err(CommandError::InvalidRange { value: -1 })
        ));
        assert!(Percent::new(356).is_err());
    }

    #[test]
    fn should_map_endpoints_onto_full_duty_range() {
        assert_eq!(Percent::OFF.to_duty(8), 0);
        assert_eq!(Percent::FULL.to_duty(8), 255);
        assert_eq!(Percent::FULL.to_duty(10), 1023);
    }

    #[test]
    fn should_interpolate_linearly() {
        assert_eq!(Percent::new(50).unwrap().to_duty(8), 127);
        assert_eq!(Percent::new(70).unwrap().to_duty(8), 178);
    }

    #[test]
    fn should_report_on_only_when_nonzero() {
        assert!(!Percent::OFF.is_on());
        assert!(Percent::new(1).unwrap().is_on());
    }

    #[test]
    fn should_clamp_resolution_when_computing_max_duty() {
        assert_eq!(max_duty(0), 1);
        assert_eq!(max_duty(32), 65_535);
    }
}
