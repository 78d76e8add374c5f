use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::broadcast;
use tracing::info;

use hawk_api::{router, ApiState};
use hawk_fc::{telemetry, StatusStore, TelemetryConfig};
use hawk_nav::{doctor as nav_doctor, MissionArea};

#[derive(Debug, Parser)]
#[command(name = "hawk", version, about = "SIMhawk - Simulated Drone Flight Controller")]
struct Cli {
    /// TOML config path; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate the configuration and exit.
    Doctor,
    /// Start the telemetry loop and serve the API.
    Run,
}

#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct Config {
    server: ServerCfg,
    telemetry: TelemetryConfig,
    mission: MissionArea,
}

#[derive(Debug, serde::Deserialize)]
#[serde(default)]
struct ServerCfg {
    bind: String,
}

impl Default for ServerCfg {
    fn default() -> Self {
        Self { bind: "127.0.0.1:8080".into() }
    }
}

fn load_config(path: Option<&str>) -> Result<Config> {
    match path {
        Some(p) => {
            let s = std::fs::read_to_string(p).context("read config")?;
            Ok(toml::from_str(&s).context("parse config toml")?)
        }
        None => Ok(Config::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_deref())?;

    match cli.cmd {
        Command::Doctor => doctor(&cfg),
        Command::Run => run(&cfg).await,
    }
}

fn doctor(cfg: &Config) -> Result<()> {
    info!("doctor: starting");
    nav_doctor::check_mission_area(&cfg.mission)?;
    anyhow::ensure!(
        cfg.telemetry.tick_interval_secs >= 1,
        "telemetry.tick_interval_secs must be >= 1"
    );
    cfg.server.bind.parse::<std::net::SocketAddr>().context("server.bind invalid")?;
    info!("doctor: OK");
    Ok(())
}

async fn run(cfg: &Config) -> Result<()> {
    info!("run: starting");

    let store = StatusStore::new();
    let (shutdown_tx, _) = broadcast::channel(1);

    let telemetry_handle = telemetry::spawn_telemetry_loop(
        store.clone(),
        cfg.telemetry.period(),
        shutdown_tx.subscribe(),
    );

    let app = router(ApiState { store, area: cfg.mission.clone() });

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("bind {}", cfg.server.bind))?;
    info!(addr = %cfg.server.bind, "api listening");

    let shutdown = {
        let tx = shutdown_tx.clone();
        async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("ctrl-c received, shutting down");
            let _ = tx.send(());
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("serve api")?;

    // Listener is down; stop the telemetry loop as well.
    let _ = shutdown_tx.send(());
    telemetry_handle.await.context("join telemetry loop")?;
    info!("shutdown complete");
    Ok(())
}
