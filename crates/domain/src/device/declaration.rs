//! Device declaration: the provisioning record consumed at startup.

use serde::{Deserialize, Serialize};

use super::{DeviceType, Direction, Line};
use crate::error::CommandError;
use crate::id::{AreaId, DeviceId};

/// One `declare(area, device, line, direction, type)` call of the startup topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDeclaration {
    pub area_id: AreaId,
    pub device_id: DeviceId,
    pub line: Line,
    pub direction: Direction,
    pub device_type: DeviceType,
}

impl DeviceDeclaration {
    /// Create a builder for constructing a [`DeviceDeclaration`].
    #[must_use]
    pub fn builder() -> DeviceDeclarationBuilder {
        DeviceDeclarationBuilder::default()
    }
}

/// Step-by-step builder for [`DeviceDeclaration`].
#[derive(Debug, Default)]
pub struct DeviceDeclarationBuilder {
    area_id: Option<String>,
    device_id: Option<String>,
    line: Option<Line>,
    direction: Option<Direction>,
    device_type: Option<DeviceType>,
}

impl DeviceDeclarationBuilder {
    #[must_use]
    pub fn area_id(mut self, area_id: impl Into<String>) -> Self {
        self.area_id = Some(area_id.into());
        self
    }

    #[must_use]
    pub fn device_id(mut self, device_id: impl Into<String>) -> Self {
        self.device_id = Some(device_id.into());
        self
    }

    #[must_use]
    pub fn line(mut self, line: u8) -> Self {
        self.line = Some(Line::new(line));
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    #[must_use]
    pub fn device_type(mut self, device_type: DeviceType) -> Self {
        self.device_type = Some(device_type);
        self
    }

    /// Consume the builder and return a [`DeviceDeclaration`].
    ///
    /// The direction defaults to [`Direction::Output`] for actuators and
    /// [`Direction::Input`] for sensors; the type defaults to [`DeviceType::Other`].
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::EmptyIdentifier`] if either id is missing or empty.
    pub fn build(self) -> Result<DeviceDeclaration, CommandError> {
        let device_type = self.device_type.unwrap_or(DeviceType::Other);
        let direction = self.direction.unwrap_or(if device_type.is_sensor() {
            Direction::Input
        } else {
            Direction::Output
        });
        Ok(DeviceDeclaration {
            area_id: AreaId::new(self.area_id.unwrap_or_default())?,
            device_id: DeviceId::new(self.device_id.unwrap_or_default())?,
            line: self.line.unwrap_or(Line::new(0)),
            direction,
            device_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_declaration_when_ids_provided() {
        let decl = DeviceDeclaration::builder()
            .area_id("zoneA")
            .device_id("fan1")
            .line(5)
            .device_type(DeviceType::Fan)
            .build()
            .unwrap();
        assert_eq!(decl.area_id.as_str(), "zoneA");
        assert_eq!(decl.line, Line::new(5));
        assert_eq!(decl.direction, Direction::Output);
    }

    #[test]
    fn should_default_sensor_direction_to_input() {
        let decl = DeviceDeclaration::builder()
            .area_id("zoneA")
            .device_id("pir1")
            .line(34)
            .device_type(DeviceType::MotionSensor)
            .build()
            .unwrap();
        assert_eq!(decl.direction, Direction::Input);
    }

    #[test]
    fn should_reject_missing_device_id() {
        let result = DeviceDeclaration::builder().area_id("zoneA").build();
        assert!(matches!(result, Err(CommandError::EmptyIdentifier)));
    }

    #[test]
    fn should_deserialize_from_toml_style_json() {
        let json = r#"{
            "area_id": "zoneB",
            "device_id": "dht",
            "line": 4,
            "direction": "input_pullup",
            "device_type": "temperature_humidity_sensor"
        }"#;
        let decl: DeviceDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(decl.device_type, DeviceType::TemperatureHumiditySensor);
        assert_eq!(decl.direction, Direction::InputPullup);
    }
}
