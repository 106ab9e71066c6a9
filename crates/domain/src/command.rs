//! Command: the functions a remote caller can invoke and the records returned.
//!
//! Commands arrive as generic structured documents; the dispatcher in the
//! `app` crate validates them field by field so that a missing field becomes
//! a structured error entry instead of a decoding failure.

mod function;
mod response;

pub use function::Function;
pub use response::{CommandResponse, DeviceResult};

/// Envelope field carrying the target area.
pub const AREA_ID_FIELD: &str = "areaId";
/// Envelope field carrying the list of device commands.
pub const DEVICES_FIELD: &str = "devices";
/// Device-entry field carrying the device id.
pub const DEVICE_ID_FIELD: &str = "deviceId";
/// Device-entry field carrying the function name.
pub const FUNCTION_FIELD: &str = "function";
/// Device-entry field carrying the function parameters.
pub const PARAMETERS_FIELD: &str = "parameters";
