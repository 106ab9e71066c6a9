//! # iocontrol-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `Hardware`: line configuration, digital writes, PWM duty writes, digital reads
//!   - `ClimateSensor`: a started temperature/humidity driver bound to one line
//!   - `TelemetrySink`: forwards snapshots to a message bus or log
//! - Define **driving/inbound** use-cases:
//!   - `ControlPlane`: device declaration, lookup and actuation behind one lock
//!   - `CommandDispatcher`: interprets command documents
//!   - `TelemetryAggregator`: produces the sensor-only snapshot
//! - Provide **in-process infrastructure** (the periodic telemetry publisher)
//!
//! ## Dependency rule
//! Depends on `iocontrol-domain` only (plus `tokio` for the publisher task).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod telemetry_publisher;

#[cfg(test)]
pub(crate) mod test_support;
