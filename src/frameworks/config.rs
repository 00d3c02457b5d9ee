use std::{env, fmt, str::FromStr, time::Duration};

// Runtime constants and environment settings (not gameplay tuning).

/// Which transport this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PeerRole {
    /// Waits for a guest on `GAME_PORT`.
    Host,
    /// Dials the host at `PEER_URL`.
    Guest,
    /// Both peers in one process over the loopback transport.
    #[default]
    Local,
}

impl FromStr for PeerRole {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "host" => Ok(PeerRole::Host),
            "guest" => Ok(PeerRole::Guest),
            "local" => Ok(PeerRole::Local),
            _ => Err(ConfigError::InvalidPeerRole(value.to_string())),
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerRole::Host => f.write_str("host"),
            PeerRole::Guest => f.write_str("guest"),
            PeerRole::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPeerRole(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPeerRole(value) => {
                write!(f, "PEER_ROLE must be host, guest or local (got {value:?})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

pub fn peer_role() -> Result<PeerRole, ConfigError> {
    match env::var("PEER_ROLE") {
        Ok(value) => value.parse(),
        Err(_) => Ok(PeerRole::default()),
    }
}

pub fn game_port() -> u16 {
    env::var("GAME_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

pub fn peer_url() -> String {
    env::var("PEER_URL").unwrap_or_else(|_| "ws://127.0.0.1:3001/ws".to_string())
}

/// Arena seed; random when unset so every match gets a new layout.
pub fn map_seed() -> u64 {
    env::var("MAP_SEED")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or_else(rand::random)
}

pub const PACKET_CHANNEL_CAPACITY: usize = 1024;
pub const INPUT_CHANNEL_CAPACITY: usize = 64;

pub const TICK_INTERVAL: Duration = Duration::from_millis(1000 / 60);
