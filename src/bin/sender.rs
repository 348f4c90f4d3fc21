//! Command Sender Application
//!
//! Sends a single panel command to a listener, for testing without the
//! hardware panel.

use anyhow::{bail, Result};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lan_audio_control::{constants::DEFAULT_UDP_PORT, network::CommandSender, protocol::Command};

#[derive(Parser, Debug)]
#[command(name = "sender", version, about = "Send one command to a listener")]
struct Args {
    /// Listener address, `IP` or `IP:PORT`
    target: String,

    /// Command words, e.g. `sliders 50|30` or `mute master`
    #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn parse_target(target: &str) -> Result<SocketAddr> {
    if let Ok(addr) = target.parse::<SocketAddr>() {
        return Ok(addr);
    }
    match target.parse::<IpAddr>() {
        Ok(ip) => Ok(SocketAddr::new(ip, DEFAULT_UDP_PORT)),
        Err(_) => bail!("Invalid target address: {}", target),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let target = parse_target(&args.target)?;

    let text = args.command.join(" ");
    let command = Command::parse(&text)?;
    if command.is_unknown() {
        bail!("Unknown command: {:?}", text);
    }

    let sender = CommandSender::connect(target).await?;
    let bytes = sender.send(&command).await?;

    tracing::info!("Sent {:?} ({} bytes) to {}", command.to_string(), bytes, target);
    Ok(())
}
