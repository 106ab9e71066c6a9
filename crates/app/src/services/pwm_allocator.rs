//! PWM channel allocator: hands out channel indices in declaration order.

use iocontrol_domain::device::PwmChannel;
use iocontrol_domain::error::PwmError;

/// Number of PWM channels on the reference board.
pub const DEFAULT_CAPACITY: u8 = 16;

/// Monotonic counter over `0..capacity`. Channels are never released.
#[derive(Debug, Clone)]
pub struct PwmAllocator {
    next: u8,
    capacity: u8,
}

impl PwmAllocator {
    #[must_use]
    pub fn new(capacity: u8) -> Self {
        Self { next: 0, capacity }
    }

    /// Reserve the next free channel.
    ///
    /// # Errors
    ///
    /// Returns [`PwmError::Exhausted`] once all channels are handed out.
    pub fn allocate(&mut self) -> Result<PwmChannel, PwmError> {
        if self.next >= self.capacity {
            return Err(PwmError::Exhausted {
                capacity: self.capacity,
            });
        }
        let channel = PwmChannel::new(self.next);
        self.next += 1;
        Ok(channel)
    }

    #[must_use]
    pub fn capacity(&self) -> u8 {
        self.capacity
    }

    #[must_use]
    pub fn allocated(&self) -> u8 {
        self.next
    }

    #[must_use]
    pub fn remaining(&self) -> u8 {
        self.capacity - self.next
    }
}

impl Default for PwmAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
