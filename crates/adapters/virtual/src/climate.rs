//! Virtual temperature/humidity sensor.

use iocontrol_app::ports::{ClimateReading, ClimateSensor};
use iocontrol_domain::device::Line;

use crate::board::VirtualHardware;

/// Sample returned until something else is injected.
pub const DEFAULT_READING: ClimateReading = ClimateReading {
    temperature_celsius: 21.5,
    humidity_percent: 45.0,
};

/// Climate driver started on one line of a [`VirtualHardware`] board.
#[derive(Debug)]
pub struct VirtualClimateSensor {
    board: VirtualHardware,
    line: Line,
}

impl VirtualClimateSensor {
    pub(crate) fn new(board: VirtualHardware, line: Line) -> Self {
        Self { board, line }
    }
}

impl ClimateSensor for VirtualClimateSensor {
    fn read(&mut self) -> ClimateReading {
        self.board
            .state()
            .climate
            .get(&self.line)
            .copied()
            .unwrap_or(DEFAULT_READING)
    }
}
