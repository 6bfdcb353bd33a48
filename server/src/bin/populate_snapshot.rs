//! Materializes the live roster into the on-disk snapshot the server falls back to.

use clap::Parser;
use log::{error, info, warn};
use server::roster::live::LiveSource;
use server::roster::snapshot::SnapshotSource;
use server::roster::source::RosterSource;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Base URL of the live roster provider
    #[clap(short, long, env = "PLAYER_GUESS_UPSTREAM_URL")]
    upstream_url: String,
    /// Directory the snapshot files are written to
    #[clap(short, long, default_value = "data")]
    snapshot_dir: PathBuf,
    /// Season label stored alongside the snapshot
    #[clap(long, default_value = "2025-26")]
    season: String,
    /// Pause between detail requests, in milliseconds
    #[clap(short, long, default_value = "600")]
    delay_ms: u64,
    /// Per-request timeout, in milliseconds
    #[clap(long, default_value = "30000")]
    timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let source = LiveSource::new(&args.upstream_url, Duration::from_millis(args.timeout_ms))?;

    let listings = source.fetch_listings().await?;
    info!("Found {} players on the roster", listings.len());

    let mut records = Vec::with_capacity(listings.len());
    let mut failed = 0;

    for (i, listing) in listings.iter().enumerate() {
        match source.record(listing.person_id).await {
            Ok(Some(record)) => records.push(record),
            Ok(None) => {
                failed += 1;
                warn!("Player {} has no detail record", listing.person_id);
            }
            Err(e) => {
                failed += 1;
                warn!(
                    "Failed to fetch {} ({}): {}",
                    listing.display_first_last, listing.person_id, e
                );
            }
        }

        if (i + 1) % 50 == 0 {
            info!("Progress: {}/{}", i + 1, listings.len());
        }

        if args.delay_ms > 0 {
            sleep(Duration::from_millis(args.delay_ms)).await;
        }
    }

    if records.is_empty() {
        error!("No player details could be fetched; leaving snapshot untouched");
        return Err("no player details fetched".into());
    }

    SnapshotSource::write(&args.snapshot_dir, Some(&args.season), listings, &records)?;

    info!(
        "Wrote snapshot to {}: {} successful, {} failed",
        args.snapshot_dir.display(),
        records.len(),
        failed
    );

    Ok(())
}
