//! Common error types used across the workspace.
//!
//! Each concern owns a typed error enum; all of them convert into
//! [`ControlError`] via `#[from]` so services can propagate with `?`.

use crate::command::Function;
use crate::device::{DeviceType, Line};
use crate::id::{AreaId, DeviceId};

/// Top-level error for every fallible control-plane operation.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Pwm(#[from] PwmError),

    #[error(transparent)]
    Sensor(#[from] SensorError),

    #[error(transparent)]
    Actuation(#[from] HardwareError),

    /// An adapter failed while moving data across a port boundary.
    #[error("transport error")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ControlError {
    /// Project this error onto the flat failure taxonomy reported to callers.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Command(err) => err.kind(),
            Self::NotFound(NotFoundError::Area(_)) => ErrorKind::UnknownArea,
            Self::NotFound(NotFoundError::Device { .. }) => ErrorKind::UnknownDevice,
            Self::Pwm(PwmError::Exhausted { .. }) => ErrorKind::PwmChannelsExhausted,
            Self::Pwm(PwmError::NotConfigured { .. }) => ErrorKind::NotConfiguredForPwm,
            Self::Sensor(_) => ErrorKind::SensorReadFailure,
            Self::Actuation(_) => ErrorKind::ActuationFailure,
            Self::Transport(_) => ErrorKind::Transport,
        }
    }
}

/// Flat classification of control-plane failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedCommand,
    UnknownArea,
    UnknownDevice,
    MissingParameter,
    InvalidRange,
    FunctionNotApplicable,
    UnknownFunction,
    NotConfiguredForPwm,
    SensorReadFailure,
    PwmChannelsExhausted,
    ActuationFailure,
    Transport,
}

/// A command (or one of its device entries) could not be interpreted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Missing 'areaId' in command")]
    MissingAreaId,

    #[error("Missing or invalid 'devices' array in command")]
    MissingDevices,

    #[error("Missing 'deviceId' or 'function' in device command")]
    MissingDeviceFields,

    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("Missing '{parameter}' parameter for '{function}' function")]
    MissingParameter {
        function: Function,
        parameter: &'static str,
    },

    #[error("Invalid percentage {value}. Must be between 0 and 100")]
    InvalidRange { value: i64 },

    #[error("Function '{function}' is not applicable for device type {device_type}")]
    FunctionNotApplicable {
        function: Function,
        device_type: DeviceType,
    },

    #[error("Unknown function '{0}'")]
    UnknownFunction(String),
}

impl CommandError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingAreaId
            | Self::MissingDevices
            | Self::MissingDeviceFields
            | Self::EmptyIdentifier => ErrorKind::MalformedCommand,
            Self::MissingParameter { .. } => ErrorKind::MissingParameter,
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
            Self::FunctionNotApplicable { .. } => ErrorKind::FunctionNotApplicable,
            Self::UnknownFunction(_) => ErrorKind::UnknownFunction,
        }
    }
}

/// A registry lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("Area '{0}' not found")]
    Area(AreaId),

    #[error("Invalid device ID '{device_id}' or area '{area_id}'")]
    Device { area_id: AreaId, device_id: DeviceId },
}

/// PWM resource failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PwmError {
    #[error("No PWM channels available (all {capacity} allocated)")]
    Exhausted { capacity: u8 },

    #[error("Line {line} not configured for PWM")]
    NotConfigured { line: Line },
}

/// Sensor read failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorError {
    #[error("Failed to read sensor on line {line}")]
    ReadFailed { line: Line },

    #[error("No sensor driver initialized on line {line}")]
    DriverMissing { line: Line },
}

/// The hardware rejected or failed a write.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Hardware fault on line {line}: {reason}")]
pub struct HardwareError {
    pub line: Line,
    pub reason: String,
}

impl HardwareError {
    #[must_use]
    pub fn new(line: Line, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}
