//! Device registry: the table of declared devices, grouped by area.

use std::collections::BTreeMap;

use iocontrol_domain::device::{DeviceEntry, DeviceType, Line, PwmChannel};
use iocontrol_domain::error::NotFoundError;
use iocontrol_domain::id::{AreaId, DeviceId};

/// Areas and their devices, both kept in identifier order.
#[derive(Debug, Default)]
pub struct Registry {
    areas: BTreeMap<AreaId, BTreeMap<DeviceId, DeviceEntry>>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `entry` under `area_id`, creating the area on first use.
    ///
    /// Returns the entry it replaced, if the device was already declared.
    pub fn insert(&mut self, area_id: AreaId, entry: DeviceEntry) -> Option<DeviceEntry> {
        self.areas
            .entry(area_id)
            .or_default()
            .insert(entry.device_id.clone(), entry)
    }

    /// Look up a declared device.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Area`] when the area was never declared and
    /// [`NotFoundError::Device`] when the area exists without that device.
    pub fn resolve(
        &self,
        area_id: &AreaId,
        device_id: &DeviceId,
    ) -> Result<&DeviceEntry, NotFoundError> {
        let devices = self
            .areas
            .get(area_id)
            .ok_or_else(|| NotFoundError::Area(area_id.clone()))?;
        devices.get(device_id).ok_or_else(|| NotFoundError::Device {
            area_id: area_id.clone(),
            device_id: device_id.clone(),
        })
    }

    /// Type of a device, or [`DeviceType::Other`] when it is not declared.
    #[must_use]
    pub fn type_of(&self, area_id: &AreaId, device_id: &DeviceId) -> DeviceType {
        self.resolve(area_id, device_id)
            .map_or(DeviceType::Other, |entry| entry.device_type)
    }

    #[must_use]
    pub fn contains_area(&self, area_id: &AreaId) -> bool {
        self.areas.contains_key(area_id)
    }

    /// Channel bound to a device of `device_type` on `line`, across all areas.
    ///
    /// Entries declared without a channel are skipped.
    #[must_use]
    pub fn pwm_channel_for(&self, device_type: DeviceType, line: Line) -> Option<PwmChannel> {
        self.devices().find_map(|(_, entry)| {
            (entry.device_type == device_type && entry.line == line)
                .then_some(entry.pwm_channel)
                .flatten()
        })
    }

    /// Every area with its devices, in identifier order.
    pub fn areas(&self) -> impl Iterator<Item = (&AreaId, &BTreeMap<DeviceId, DeviceEntry>)> {
        self.areas.iter()
    }

    /// Every device together with its area.
    pub fn devices(&self) -> impl Iterator<Item = (&AreaId, &DeviceEntry)> {
        self.areas
            .iter()
            .flat_map(|(area_id, devices)| devices.values().map(move |entry| (area_id, entry)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
