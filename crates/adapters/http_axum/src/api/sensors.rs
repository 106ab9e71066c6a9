//! JSON handler for on-demand sensor snapshots.

use axum::Json;
use axum::extract::State;

use iocontrol_app::ports::Hardware;
use iocontrol_domain::telemetry::Snapshot;

use crate::state::AppState;

/// `GET /api/sensors`
pub async fn snapshot<H>(State(state): State<AppState<H>>) -> Json<Snapshot>
where
    H: Hardware + 'static,
{
    Json(state.telemetry.snapshot())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use iocontrol_adapter_virtual::VirtualHardware;
    use iocontrol_app::services::control_plane::{ControlPlane, PwmSettings, SharedControlPlane};
    use iocontrol_domain::device::{DeviceDeclaration, DeviceType, Line};
    use tower::ServiceExt;

    use crate::state::AppState;

    #[tokio::test]
    async fn should_return_sensor_only_snapshot() {
        let board = VirtualHardware::new();
        let mut plane = ControlPlane::new(board.clone(), PwmSettings::default());
        for (device, line, device_type) in [
            ("pir1", 34, DeviceType::MotionSensor),
            ("led1", 18, DeviceType::Light),
        ] {
            plane
                .declare(
                    DeviceDeclaration::builder()
                        .area_id("zoneA")
                        .device_id(device)
                        .line(line)
                        .device_type(device_type)
                        .build()
                        .unwrap(),
                )
                .unwrap();
        }
        board.set_input_level(Line::new(34), true);
        let app = crate::router::build(AppState::new(&SharedControlPlane::new(plane)));

        let response = app
            .oneshot(Request::get("/api/sensors").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "success");
        let sensors = json["areas"][0]["sensors"].as_array().unwrap();
        assert_eq!(sensors.len(), 1);
        assert_eq!(sensors[0]["type"], "PIR");
        assert_eq!(sensors[0]["motion_detected"], true);
    }
}
