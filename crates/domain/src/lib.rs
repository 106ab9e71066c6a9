//! # iocontrol-domain
//!
//! Pure domain model for the iocontrol appliance control plane.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, physical lines, PWM channels, error conventions
//! - Define **Devices** (lights, fans, sensors bound to a physical line)
//! - Define **Areas** (logical groupings such as rooms) through [`id::AreaId`]
//! - Define **Levels** (validated 0 to 100 percentages and their duty-cycle mapping)
//! - Define **Commands** (the closed set of functions and the response records)
//! - Define **Telemetry** (the sensor-only snapshot record)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod command;
pub mod device;
pub mod level;
pub mod state;
pub mod telemetry;
