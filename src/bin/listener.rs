//! Command Listener Application
//!
//! Receives panel commands over UDP and applies them to the host audio.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lan_audio_control::{
    backend,
    config::{AppConfig, BackendKind},
    dispatch::Dispatcher,
    network::CommandListener,
};

#[derive(Parser, Debug)]
#[command(name = "listener", version, about = "Apply slider panel commands to the host audio")]
struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address override
    #[arg(long)]
    bind: Option<String>,

    /// UDP port override
    #[arg(short, long)]
    port: Option<u16>,

    /// Log backend invocations instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.network.bind_address = bind;
    }
    if let Some(port) = args.port {
        config.network.udp_port = port;
    }
    if args.dry_run {
        config.backend.kind = BackendKind::DryRun;
    }
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    tracing::info!("Starting LAN Audio Control listener");
    tracing::info!(
        "{} slider process target(s) configured",
        config.processes.len().saturating_sub(1)
    );

    let backend = backend::from_config(&config);
    let dispatcher = Dispatcher::new(backend, Arc::new(config.processes.clone()));
    let listener = CommandListener::bind(&config.network, dispatcher)
        .context("Failed to start command listener")?;

    tokio::select! {
        result = listener.run() => {
            result.context("Command listener stopped")?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutting down");
        }
    }

    let stats = listener.stats();
    tracing::info!(
        "Listener stats: {} packets, {} bytes, {} invalid, {} unknown",
        stats.packets_received,
        stats.bytes_received,
        stats.invalid_packets,
        stats.unknown_commands
    );

    Ok(())
}
