//! Runtime state: last commanded values, keyed by line.

use std::collections::HashMap;

use iocontrol_domain::device::Line;
use iocontrol_domain::level::Percent;

/// What the control plane last wrote to each line.
///
/// `last_active` only ever holds non-zero levels, so a toggle back on
/// returns to the most recent visible level.
#[derive(Debug, Default)]
pub struct RuntimeState {
    digital: HashMap<Line, bool>,
    levels: HashMap<Line, Percent>,
    last_active: HashMap<Line, Percent>,
}

impl RuntimeState {
    #[must_use]
    pub fn digital_state(&self, line: Line) -> Option<bool> {
        self.digital.get(&line).copied()
    }

    #[must_use]
    pub fn current_level(&self, line: Line) -> Option<Percent> {
        self.levels.get(&line).copied()
    }

    #[must_use]
    pub fn last_active_level(&self, line: Line) -> Option<Percent> {
        self.last_active.get(&line).copied()
    }

    /// Level a toggle-on moves to: the last non-zero level, or full power.
    #[must_use]
    pub fn restore_level(&self, line: Line) -> Percent {
        self.last_active_level(line).unwrap_or(Percent::FULL)
    }

    pub fn record_digital(&mut self, line: Line, high: bool) {
        self.digital.insert(line, high);
    }

    pub fn record_level(&mut self, line: Line, level: Percent) {
        self.levels.insert(line, level);
        if level.is_on() {
            self.last_active.insert(line, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pct(value: i64) -> Percent {
        Percent::new(value).unwrap()
    }

    #[test]
    fn should_remember_last_non_zero_level() {
        let mut state = RuntimeState::default();
        let line = Line::new(5);

        state.record_level(line, pct(70));
        state.record_level(line, Percent::OFF);

        assert_eq!(state.current_level(line), Some(Percent::OFF));
        assert_eq!(state.last_active_level(line), Some(pct(70)));
        assert_eq!(state.restore_level(line), pct(70));
    }

    #[test]
    fn should_restore_full_power_when_never_active() {
        let mut state = RuntimeState::default();
        let line = Line::new(18);
        state.record_level(line, Percent::OFF);

        assert_eq!(state.last_active_level(line), None);
        assert_eq!(state.restore_level(line), Percent::FULL);
    }

    #[test]
    fn should_track_digital_state() {
        let mut state = RuntimeState::default();
        assert_eq!(state.digital_state(Line::new(2)), None);
        state.record_digital(Line::new(2), true);
        assert_eq!(state.digital_state(Line::new(2)), Some(true));
    }
}
