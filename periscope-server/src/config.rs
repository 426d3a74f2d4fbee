use crate::error::RelayError;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 5050;

/// Origins the browser clients were served from in the reference deployment.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173",
    "https://localhost:5173",
];

/// Which connections receive a relayed `offer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OfferPolicy {
    /// Every connection except the sender, whatever its role.
    #[default]
    AllPeers,
    /// Only connections registered as viewers.
    ViewersOnly,
}

impl FromStr for OfferPolicy {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all-peers" | "all" => Ok(Self::AllPeers),
            "viewers-only" | "viewers" => Ok(Self::ViewersOnly),
            other => Err(RelayError::InvalidOfferPolicy(other.to_owned())),
        }
    }
}

/// WebSocket keep-alive. A connection that stays silent for `timeout` is torn
/// down as if it had disconnected.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(25),
            timeout: Duration::from_secs(45),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub offer_policy: OfferPolicy,
    /// Capacity of the relay command queue.
    pub command_buffer: usize,
    pub heartbeat: HeartbeatConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            allowed_origins: DEFAULT_ALLOWED_ORIGINS
                .iter()
                .map(|o| (*o).to_owned())
                .collect(),
            offer_policy: OfferPolicy::default(),
            command_buffer: 256,
            heartbeat: HeartbeatConfig::default(),
        }
    }
}
