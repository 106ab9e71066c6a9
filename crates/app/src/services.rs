//! Application services: use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod actuation;
pub mod control_plane;
pub mod dispatcher;
pub mod provisioning;
pub mod pwm_allocator;
pub mod registry;
pub mod runtime_state;
pub mod telemetry;
