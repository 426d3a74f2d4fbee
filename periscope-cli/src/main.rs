use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use periscope_server::{
    AppState, DEFAULT_ALLOWED_ORIGINS, HeartbeatConfig, OfferPolicy, RelayConfig, serve,
};
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// WebRTC signaling relay between a camera phone and a viewing dashboard.
#[derive(Parser, Debug)]
#[command(name = "periscope", version, about)]
struct Args {
    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0", env = "PERISCOPE_HOST")]
    host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, default_value_t = periscope_server::DEFAULT_PORT, env = "PERISCOPE_PORT")]
    port: u16,

    /// Browser origins allowed to connect (comma-separated).
    #[arg(
        long,
        value_delimiter = ',',
        env = "PERISCOPE_ALLOWED_ORIGINS",
        default_values_t = default_origins()
    )]
    allowed_origins: Vec<String>,

    /// Who receives offers: `all-peers` or `viewers-only`.
    #[arg(long, default_value = "all-peers", env = "PERISCOPE_OFFER_POLICY")]
    offer_policy: OfferPolicy,

    /// Seconds between WebSocket pings.
    #[arg(long, default_value_t = 25, env = "PERISCOPE_HEARTBEAT_INTERVAL")]
    heartbeat_interval: u64,

    /// Seconds of silence after which a connection is dropped.
    #[arg(long, default_value_t = 45, env = "PERISCOPE_HEARTBEAT_TIMEOUT")]
    heartbeat_timeout: u64,

    /// Capacity of the relay command queue.
    #[arg(long, default_value_t = 256)]
    command_buffer: usize,
}

fn default_origins() -> Vec<String> {
    DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()
}

impl Args {
    fn into_config(self) -> Result<RelayConfig> {
        anyhow::ensure!(
            self.heartbeat_timeout > self.heartbeat_interval,
            "--heartbeat-timeout ({}s) must exceed --heartbeat-interval ({}s)",
            self.heartbeat_timeout,
            self.heartbeat_interval
        );
        anyhow::ensure!(self.command_buffer > 0, "--command-buffer must be positive");

        Ok(RelayConfig {
            bind_addr: SocketAddr::new(self.host, self.port),
            allowed_origins: self.allowed_origins,
            offer_policy: self.offer_policy,
            command_buffer: self.command_buffer,
            heartbeat: HeartbeatConfig {
                interval: Duration::from_secs(self.heartbeat_interval),
                timeout: Duration::from_secs(self.heartbeat_timeout),
            },
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "periscope=info,periscope_server=info".into()),
        )
        .init();

    let config = Args::parse().into_config()?;

    println!("{}", "📡 Starting Periscope signaling relay...".green().bold());
    println!("   🩺 Health:  http://{}/health", config.bind_addr);
    println!("   🔌 Signal:  ws://{}/ws", config.bind_addr);
    println!("   🌐 Origins: {}", config.allowed_origins.join(", ").cyan());

    let bind_addr = config.bind_addr;
    let state = AppState::new(config);

    serve(state, shutdown_signal())
        .await
        .with_context(|| format!("Relay failed on {}", bind_addr))?;

    println!("{}", "👋 Relay shut down.".green());
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Ctrl-C received, shutting down");
    }
}
