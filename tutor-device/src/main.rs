//! Rhythm tutor device - main entry point
//!
//! Loads configuration, resolves the telemetry endpoint when the networked
//! variant is enabled (fatal if discovery fails), wires the bench hardware
//! ports into the session state machine, and runs the session to
//! completion. After the final level the device idles until interrupted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutor_common::config::DeviceConfig;
use tutor_common::pattern::Catalog;
use tutor_device::discovery;
use tutor_device::engine::{AssessParams, RhythmEngine};
use tutor_device::session::Session;
use tutor_device::sim::{BenchStrummer, ConsoleDisplay, KeySensor};
use tutor_device::telemetry::TelemetryClient;

/// Command-line arguments for tutor-device
#[derive(Parser, Debug)]
#[command(name = "tutor-device")]
#[command(about = "Interactive rhythm-training device")]
#[command(version)]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "tutor.toml", env = "TUTOR_CONFIG")]
    config: PathBuf,

    /// Enable telemetry regardless of the config file
    #[arg(long)]
    telemetry: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutor_device=debug,tutor_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config =
        DeviceConfig::load_or_default(&args.config).context("Failed to load configuration")?;
    if args.telemetry {
        config.telemetry.enabled = true;
    }

    let catalog = Catalog::from_base(
        &config.session.base_patterns,
        config.session.tempo_scale,
        config.session.pass_score,
    )
    .context("Failed to build level catalog")?;
    info!(
        "Loaded {} levels (tempo scale {}, pass score {}%)",
        catalog.len(),
        config.session.tempo_scale,
        config.session.pass_score
    );

    // Networked variant: resolve the endpoint once, before any prompt.
    // Discovery failure aborts startup.
    let telemetry = if config.telemetry.enabled {
        let host = discovery::discover(&config.telemetry)
            .await
            .context("Server discovery failed")?;
        let endpoint = discovery::endpoint_url(
            host,
            config.telemetry.data_port,
            &config.telemetry.data_path,
        );
        info!("Telemetry endpoint: {}", endpoint);
        Some(TelemetryClient::new(endpoint).context("Failed to build telemetry client")?)
    } else {
        None
    };

    let strummer = BenchStrummer::from_config(&config.strummer);
    let sensor = KeySensor::spawn();
    let engine = RhythmEngine::new(sensor, AssessParams::from_config(&config));

    let mut session = Session::new(strummer, ConsoleDisplay, engine, catalog, telemetry);
    let summary = session.run().await;
    info!(
        "Session complete: {} levels in {} attempts",
        summary.attempts.iter().filter(|a| a.passed).count(),
        summary.attempts.len()
    );

    // Terminal idle state: park until interrupted
    signal::ctrl_c().await.context("Failed to wait for Ctrl+C")?;
    info!("Received Ctrl+C, shutting down");
    Ok(())
}
