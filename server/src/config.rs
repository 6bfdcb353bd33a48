//! Runtime settings carried from the command line into the library

use shared::DEFAULT_MAX_GUESSES;
use std::path::PathBuf;
use std::time::Duration;

/// Public CDN pattern for player headshots
pub const IMAGE_URL_PREFIX: &str = "https://cdn.nba.com/headshots/nba/latest/1040x760";

pub fn image_url(id: shared::EntityId) -> String {
    format!("{}/{}.png", IMAGE_URL_PREFIX, id)
}

/// Settings for the two-tier roster resolver
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Base URL of the live roster provider; `None` disables the live tier
    pub upstream_url: Option<String>,
    /// Upper bound for any single live call
    pub upstream_timeout: Duration,
    /// Directory holding `players_cache.json` and `player_details_cache.json`
    pub snapshot_dir: PathBuf,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            upstream_url: None,
            upstream_timeout: Duration::from_secs(5),
            snapshot_dir: PathBuf::from("data"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub max_guesses: u32,
    /// How often the active session count is logged
    pub stats_interval: Duration,
    pub resolver: ResolverConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            max_guesses: DEFAULT_MAX_GUESSES,
            stats_interval: Duration::from_secs(60),
            resolver: ResolverConfig::default(),
        }
    }
}
