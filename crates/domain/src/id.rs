//! Typed identifier newtypes backed by non-empty strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

macro_rules! define_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap an identifier string.
            ///
            /// # Errors
            ///
            /// Returns [`CommandError::EmptyIdentifier`] when `value` is empty.
            pub fn new(value: impl Into<String>) -> Result<Self, CommandError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(CommandError::EmptyIdentifier);
                }
                Ok(Self(value))
            }

            /// Borrow the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = CommandError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CommandError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of an area (room, zone), the top-level registry key.
    AreaId
);

define_id!(
    /// Identifier of a device, unique within its area.
    DeviceId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_roundtrip_through_display_and_from_str() {
        let id = DeviceId::new("891647d0-e5a8-4f02-bfce-a17facfa6e5c").unwrap();
        let parsed: DeviceId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn should_reject_empty_identifier() {
        assert!(matches!(
            AreaId::new(""),
            Err(CommandError::EmptyIdentifier)
        ));
    }

    #[test]
    fn should_serialize_as_plain_string() {
        let id = AreaId::new("zoneA").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"zoneA\"");
    }

    #[test]
    fn should_reject_empty_string_when_deserializing() {
        let result = serde_json::from_str::<AreaId>("\"\"");
        assert!(result.is_err());
    }
}
