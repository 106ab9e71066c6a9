//! Provisioning: applies the startup topology to a control plane.

use iocontrol_domain::device::{DeviceDeclaration, DeviceType};
use iocontrol_domain::error::ControlError;

use crate::ports::Hardware;
use crate::services::control_plane::SharedControlPlane;

/// Outcome of [`provision`]: how many devices came up cleanly and which did not.
#[derive(Debug, Default)]
pub struct ProvisioningReport {
    pub declared: usize,
    pub failures: Vec<(DeviceDeclaration, ControlError)>,
}

impl ProvisioningReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Declare every device in order, then drive lights and fans to level 0.
///
/// A failing declaration is recorded and provisioning moves on to the next one.
#[tracing::instrument(skip_all, fields(devices = declarations.len()))]
pub fn provision<H: Hardware>(
    plane: &SharedControlPlane<H>,
    declarations: &[DeviceDeclaration],
) -> ProvisioningReport {
    let mut report = ProvisioningReport::default();
    let mut guard = plane.lock();

    for declaration in declarations {
        match guard.declare(declaration.clone()) {
            Ok(_) => report.declared += 1,
            Err(err) => report.failures.push((declaration.clone(), err)),
        }
    }

    for declaration in declarations {
        let outcome = match declaration.device_type {
            DeviceType::Light => guard.set_brightness(declaration.line, 0).map(drop),
            DeviceType::Fan => guard.set_fan_speed(declaration.line, 0).map(drop),
            DeviceType::TemperatureHumiditySensor | DeviceType::MotionSensor | DeviceType::Other => {
                Ok(())
            }
        };
        if let Err(err) = outcome {
            tracing::debug!(device_id = %declaration.device_id, error = %err, "initial level not applied");
        }
    }

    tracing::info!(
        declared = report.declared,
        failed = report.failures.len(),
        registered = guard.registry().len(),
        "provisioning complete"
    );
    report
}
