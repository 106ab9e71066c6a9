//! In-memory board used by the service tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use iocontrol_domain::device::{Direction, Line, PwmChannel};
use iocontrol_domain::error::HardwareError;

use crate::ports::{ClimateReading, ClimateSensor, Hardware};

#[derive(Debug, Default)]
pub struct BoardState {
    pub modes: HashMap<Line, Direction>,
    pub bindings: HashMap<PwmChannel, (Line, u32, u8)>,
    pub duties: HashMap<PwmChannel, u32>,
    pub digital: HashMap<Line, bool>,
    pub climate: HashMap<Line, ClimateReading>,
    pub faulty: HashSet<Line>,
    pub duty_writes: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeBoard(pub Arc<Mutex<BoardState>>);

impl FakeBoard {
    pub fn state(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.0.lock().unwrap()
    }

    pub fn duty_on_line(&self, line: Line) -> Option<u32> {
        let state = self.state();
        let (channel, _) = state.bindings.iter().find(|(_, (l, _, _))| *l == line)?;
        state.duties.get(channel).copied()
    }
}

pub struct FakeClimate {
    line: Line,
    board: FakeBoard,
}

impl ClimateSensor for FakeClimate {
    fn read(&mut self) -> ClimateReading {
        self.board
            .state()
            .climate
            .get(&self.line)
            .copied()
            .unwrap_or(ClimateReading {
                temperature_celsius: 21.5,
                humidity_percent: 45.0,
            })
    }
}

impl Hardware for FakeBoard {
    type ClimateSensor = FakeClimate;

    fn configure_line(&mut self, line: Line, direction: Direction) -> Result<(), HardwareError> {
        self.state().modes.insert(line, direction);
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
        if state.faulty.contains(&line) {
            return Err(HardwareError::new(line, "attach refused"));
        }
        state
            .bindings
            .insert(channel, (line, frequency_hz, resolution_bits));
        Ok(())
    }

    fn write_duty(&mut self, channel: PwmChannel, duty: u32) -> Result<(), HardwareError> {
        let mut state = self.state();
        if let Some((line, _, _)) = state.bindings.get(&channel).copied() {
            if state.faulty.contains(&line) {
                return Err(HardwareError::new(line, "write refused"));
            }
        }
        state.duties.insert(channel, duty);
        state.duty_writes += 1;
        Ok(())
    }

    fn write_digital(&mut self, line: Line, high: bool) -> Result<(), HardwareError> {
        let mut state = self.state();
        if state.faulty.contains(&line) {
            return Err(HardwareError::new(line, "write refused"));
        }
        state.digital.insert(line, high);
        Ok(())
    }

    fn read_digital(&mut self, line: Line) -> bool {
        self.state().digital.get(&line).copied().unwrap_or(false)
    }

    fn start_climate_sensor(&mut self, line: Line) -> Result<FakeClimate, HardwareError> {
        Ok(FakeClimate {
            line,
            board: self.clone(),
        })
    }
}
