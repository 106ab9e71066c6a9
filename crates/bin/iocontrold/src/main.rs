//! # iocontrold
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Initialize structured logging
//! - Construct the hardware adapter and the control plane
//! - Provision the declared device topology
//! - Start the periodic telemetry publisher with the configured sink
//! - Build the axum router, bind to a TCP port and serve
//! - Handle graceful shutdown (SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer. No domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use iocontrol_adapter_http_axum::router;
use iocontrol_adapter_http_axum::state::AppState;
use iocontrol_adapter_mqtt::MqttTelemetrySink;
use iocontrol_adapter_virtual::VirtualHardware;
use iocontrol_app::services::control_plane::{ControlPlane, SharedControlPlane};
use iocontrol_app::services::dispatcher::CommandDispatcher;
use iocontrol_app::services::provisioning::provision;
use iocontrol_app::services::telemetry::TelemetryAggregator;
use iocontrol_app::telemetry_publisher::{LogSink, TelemetryPublisher};

use crate::config::{Config, SinkKind};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter).context("invalid log filter")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Hardware and control plane
    let board = VirtualHardware::new();
    let plane = SharedControlPlane::new(ControlPlane::new(board, config.hardware.pwm_settings()));

    let report = provision(&plane, &config.devices);
    for (declaration, err) in &report.failures {
        tracing::warn!(
            area_id = %declaration.area_id,
            device_id = %declaration.device_id,
            error = %err,
            "device not fully provisioned"
        );
    }

    // Services
    let dispatcher = Arc::new(CommandDispatcher::new(plane.clone()));
    let telemetry = Arc::new(TelemetryAggregator::new(plane));
    let publisher = start_publisher(&config, Arc::clone(&telemetry));

    // HTTP
    let app = router::build(AppState::from_arcs(dispatcher, telemetry));
    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(%bind_addr, "iocontrold listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(handle) = publisher {
        handle.abort();
    }
    tracing::info!("iocontrold stopped");
    Ok(())
}

fn start_publisher(
    config: &Config,
    telemetry: Arc<TelemetryAggregator<VirtualHardware>>,
) -> Option<JoinHandle<()>> {
    if !config.telemetry.enabled {
        tracing::info!("telemetry publisher disabled");
        return None;
    }
    let interval = config.telemetry.interval();
    let handle = match config.telemetry.sink {
        SinkKind::Log => TelemetryPublisher::new(telemetry, LogSink, interval).start(),
        SinkKind::Mqtt => {
            let mut sink = MqttTelemetrySink::new(config.mqtt.clone());
            sink.connect();
            TelemetryPublisher::new(telemetry, sink, interval).start()
        }
    };
    Some(handle)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
