//! # iocontrol-adapter-virtual
//!
//! Simulated board implementing the [`Hardware`](iocontrol_app::ports::Hardware)
//! port. Every write lands in shared in-memory state that tests (or a demo
//! process) can inspect, and inputs can be injected from outside.
//!
//! ## Simulated peripherals
//!
//! | Peripheral | Behaviour |
//! |------------|-----------|
//! | Digital line | Remembers the last written level; inputs read back injected levels (LOW by default) |
//! | PWM channel | Remembers its binding and last duty value |
//! | Climate sensor | Returns the injected sample, `21.5 °C / 45 %` by default |
//!
//! ## Dependency rule
//!
//! Depends on `iocontrol-app` (port traits) and `iocontrol-domain` only.

mod board;
mod climate;

pub use board::{PwmBinding, VirtualHardware};
pub use climate::{DEFAULT_READING, VirtualClimateSensor};
