//! Device: a logical device bound to one physical line.

mod declaration;
mod kind;

pub use declaration::{DeviceDeclaration, DeviceDeclarationBuilder};
pub use kind::DeviceType;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::DeviceId;

/// Physical line (pin) number on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Line(u8);

impl Line {
    #[must_use]
    pub const fn new(number: u8) -> Self {
        Self(number)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Hardware PWM channel index handed out by the allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PwmChannel(u8);

impl PwmChannel {
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PwmChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Electrical mode of a line, fixed at declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Input,
    InputPullup,
    Output,
}

/// Registry record binding a device id to its line, mode, type and PWM channel.
///
/// Only the registry creates entries; everything else works on copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceEntry {
    pub device_id: DeviceId,
    pub line: Line,
    pub direction: Direction,
    pub device_type: DeviceType,
    /// Present only for [`DeviceType::requires_pwm`] types whose allocation succeeded.
    pub pwm_channel: Option<PwmChannel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_line_number() {
        assert_eq!(Line::new(34).to_string(), "34");
    }

    #[test]
    fn should_deserialize_direction_from_snake_case() {
        let dir: Direction = serde_json::from_str("\"input_pullup\"").unwrap();
        assert_eq!(dir, Direction::InputPullup);
    }
}
