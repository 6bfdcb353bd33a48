use clap::Parser;
use log::{error, info};
use server::config::{ResolverConfig, ServerConfig};
use server::game::GameOrchestrator;
use server::network::Server;
use server::roster::RosterResolver;
use server::session::SessionStore;
use shared::DEFAULT_MAX_GUESSES;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Command line arguments
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Server IP address to bind to
    #[clap(short = 'H', long, default_value = "127.0.0.1")]
    host: String,
    /// Server port to listen on
    #[clap(short, long, default_value = "8080")]
    port: u16,
    /// Base URL of the live roster provider; omit to serve from the snapshot only
    #[clap(short, long, env = "PLAYER_GUESS_UPSTREAM_URL")]
    upstream_url: Option<String>,
    /// Upper bound for a single live roster call, in milliseconds
    #[clap(long, default_value = "5000")]
    upstream_timeout_ms: u64,
    /// Directory holding the roster snapshot files
    #[clap(short, long, default_value = "data")]
    snapshot_dir: PathBuf,
    /// Guesses allowed per game
    #[clap(short, long, default_value_t = DEFAULT_MAX_GUESSES)]
    max_guesses: u32,
    /// Seconds between session statistics log lines
    #[clap(long, default_value = "60")]
    stats_interval_secs: u64,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        ServerConfig {
            bind_addr: format!("{}:{}", args.host, args.port),
            max_guesses: args.max_guesses,
            stats_interval: Duration::from_secs(args.stats_interval_secs.max(1)),
            resolver: ResolverConfig {
                upstream_url: args.upstream_url.filter(|url| !url.trim().is_empty()),
                upstream_timeout: Duration::from_millis(args.upstream_timeout_ms.max(1)),
                snapshot_dir: args.snapshot_dir,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ServerConfig::from(Args::parse());

    match &config.resolver.upstream_url {
        Some(url) => info!(
            "Live roster at {} (timeout {:?}), snapshot in {}",
            url,
            config.resolver.upstream_timeout,
            config.resolver.snapshot_dir.display()
        ),
        None => info!(
            "No upstream configured, serving roster from {}",
            config.resolver.snapshot_dir.display()
        ),
    }

    let resolver = Arc::new(RosterResolver::from_config(&config.resolver));
    let game = Arc::new(GameOrchestrator::new(
        resolver,
        Arc::new(SessionStore::new()),
        config.max_guesses,
    ));

    let mut server = Server::new(&config.bind_addr, game, config.stats_interval).await?;

    tokio::select! {
        result = server.run() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down gracefully...");
        }
    }

    Ok(())
}
