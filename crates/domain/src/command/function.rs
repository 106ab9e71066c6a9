//! Function: the closed set of operations a device command can request.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Function {
    #[serde(rename = "toggle")]
    Toggle,
    #[serde(rename = "setspeed")]
    SetSpeed,
    #[serde(rename = "setbrightness")]
    SetBrightness,
    #[serde(rename = "getReadings")]
    GetReadings,
}

impl Function {
    /// Wire name of the function.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::SetSpeed => "setspeed",
            Self::SetBrightness => "setbrightness",
            Self::GetReadings => "getReadings",
        }
    }

    /// Name of the single parameter this function requires, if any.
    #[must_use]
    pub fn parameter(self) -> Option<&'static str> {
        match self {
            Self::Toggle => Some("state"),
            Self::SetSpeed => Some("speed"),
            Self::SetBrightness => Some("brightness"),
            Self::GetReadings => None,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Function {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "toggle" => Ok(Self::Toggle),
            "setspeed" => Ok(Self::SetSpeed),
            "setbrightness" => Ok(Self::SetBrightness),
            "getReadings" => Ok(Self::GetReadings),
            other => Err(CommandError::UnknownFunction(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_wire_names() {
        assert_eq!("toggle".parse::<Function>().unwrap(), Function::Toggle);
        assert_eq!("setspeed".parse::<Function>().unwrap(), Function::SetSpeed);
        assert_eq!(
            "setbrightness".parse::<Function>().unwrap(),
            Function::SetBrightness
        );
        assert_eq!(
            "getReadings".parse::<Function>().unwrap(),
            Function::GetReadings
        );
    }

    #[test]
    fn should_reject_unknown_function_names() {
        let result = "explode".parse::<Function>();
        assert_eq!(result, Err(CommandError::UnknownFunction("explode".into())));
    }

    #[test]
    fn should_be_case_sensitive() {
        assert!("getreadings".parse::<Function>().is_err());
        assert!("Toggle".parse::<Function>().is_err());
    }

    #[test]
    fn should_name_required_parameter() {
        assert_eq!(Function::Toggle.parameter(), Some("state"));
        assert_eq!(Function::SetSpeed.parameter(), Some("speed"));
        assert_eq!(Function::GetReadings.parameter(), None);
    }
}
