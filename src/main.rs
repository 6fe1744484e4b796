//! MAVLink bridge - TCP link to an autopilot
//!
//! Usage:
//!   mav-bridge                        Connect with config/default endpoint
//!   mav-bridge --ip 10.0.0.2 --port 5760
//!   mav-bridge --config bridge.toml -v
//!
//! Connects at startup, requests STATUSTEXT streaming, then drives the
//! session at a fixed tick rate until ctrl-c (or SIGTERM) or the server
//! closes the connection.

use anyhow::Result;
use clap::Parser;
use mavlink_bridge::bridge::{ConnectionState, Session, SessionConfig, Stats};
use mavlink_bridge::cli::Cli;
use mavlink_bridge::config::{self, Config};
use mavlink_bridge::constants::{CHANNEL_CAPACITY, TICK_INTERVAL_MS};
use mavlink_bridge::error::BridgeError;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from("config.toml"));
    let mut config = config::load(&config_path)?;
    if let Some(ip) = cli.ip {
        config.connection.server_ip = ip;
    }
    if let Some(port) = cli.port {
        config.connection.server_port = port;
    }
    config.validate()?;

    let rt = tokio::runtime::Runtime::new().map_err(|e| BridgeError::Runtime { source: e })?;
    rt.block_on(run(config))
}

async fn run(config: Config) -> Result<()> {
    // Setup shutdown handler
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_clone = shutdown.clone();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            let mut sigterm =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()).unwrap();
            let mut sigint =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt()).unwrap();

            tokio::select! {
                _ = sigterm.recv() => {},
                _ = sigint.recv() => {},
            }
            shutdown_clone.store(true, Ordering::SeqCst);
        });
    }

    #[cfg(windows)]
    {
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            shutdown_clone.store(true, Ordering::SeqCst);
        });
    }

    let stats = Arc::new(Stats::new());
    let (text_tx, mut text_rx) = mpsc::channel::<String>(CHANNEL_CAPACITY);
    let mut session = Session::new(SessionConfig::from(&config), stats.clone(), Some(text_tx));

    session.connect()?;

    let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut last_tick = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        tokio::select! {
            _ = interval.tick() => {
                let now = Instant::now();
                session.on_tick(now - last_tick);
                last_tick = now;

                if session.state() == ConnectionState::Disconnected {
                    warn!("Connection lost, exiting");
                    break;
                }
            }
            Some(text) = text_rx.recv() => {
                info!("Autopilot: {}", text);
            }
        }
    }

    session.disconnect();
    info!(
        frames = stats.frames_rx(),
        dropped = stats.frames_dropped(),
        heartbeats = stats.heartbeats_tx(),
        rx_bytes = stats.rx_bytes(),
        tx_bytes = stats.tx_bytes(),
        "Link summary"
    );
    Ok(())
}
