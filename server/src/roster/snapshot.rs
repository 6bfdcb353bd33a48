//! Static on-disk roster used when the live provider is unavailable
//!
//! The snapshot is two JSON files written by the `populate_snapshot` job:
//! `players_cache.json` holds the roster listing and
//! `player_details_cache.json` holds full player details keyed by id.
//! Both are read once at startup and never reloaded.

use super::live::PlayerListing;
use super::normalize::RawPlayer;
use super::source::RosterSource;
use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use shared::{AttributeValue, EntityId, EntityRecord, EntitySummary};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

pub const PLAYERS_FILE: &str = "players_cache.json";
pub const DETAILS_FILE: &str = "player_details_cache.json";

#[derive(Debug, Serialize, Deserialize)]
pub struct PlayersFile {
    #[serde(default)]
    pub season: Option<String>,
    pub players: Vec<PlayerListing>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailsFile {
    #[serde(default)]
    pub last_updated: Option<String>,
    pub players: BTreeMap<String, SnapshotPlayer>,
}

/// Player details as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotPlayer {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub team_abbreviation: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub jersey_number: Option<u32>,
    #[serde(default)]
    pub ppg: f64,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
}

impl SnapshotPlayer {
    pub fn from_record(record: &EntityRecord, season: Option<&str>) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            team: record.team.clone(),
            team_abbreviation: record.team_abbreviation.clone(),
            division: record.division.clone(),
            conference: record.conference.clone(),
            age: Some(record.age),
            height: AttributeValue::Inches(record.height_inches).to_string(),
            position: record.position.to_string(),
            jersey_number: Some(record.jersey_number),
            ppg: record.scoring_rate,
            image_url: record.image_url.clone(),
            season: season.map(str::to_string),
        }
    }

    fn into_raw(self) -> RawPlayer {
        RawPlayer {
            id: self.id,
            name: self.name,
            team: self.team,
            team_abbreviation: self.team_abbreviation,
            division: self.division,
            conference: self.conference,
            age: self.age,
            height: self.height,
            position: self.position,
            jersey_number: self.jersey_number,
            ppg: self.ppg,
            image_url: self.image_url,
        }
    }
}

/// In-memory copy of a previously materialized roster
#[derive(Debug, Default)]
pub struct SnapshotSource {
    summaries: Vec<EntitySummary>,
    records: HashMap<EntityId, EntityRecord>,
}

impl SnapshotSource {
    /// Reads both snapshot files from `dir`.
    ///
    /// Details that fail validation are skipped, and so are listing entries
    /// without a usable detail record.
    pub fn load(dir: &Path) -> SourceResult<Self> {
        let players: PlayersFile =
            serde_json::from_str(&fs::read_to_string(dir.join(PLAYERS_FILE))?)?;
        let details: DetailsFile =
            serde_json::from_str(&fs::read_to_string(dir.join(DETAILS_FILE))?)?;

        let mut records = HashMap::new();
        let mut skipped = 0;
        for (key, player) in details.players {
            match player.into_raw().into_record() {
                Ok(record) => {
                    records.insert(record.id, record);
                }
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping snapshot player {}: {}", key, e);
                }
            }
        }

        let summaries: Vec<EntitySummary> = players
            .players
            .iter()
            .filter(|listing| records.contains_key(&listing.person_id))
            .map(|listing| {
                let mut summary = listing.summary();
                if summary.team.is_empty() {
                    summary.team = records[&listing.person_id].summary().team;
                }
                summary
            })
            .collect();

        info!(
            "Loaded snapshot from {} (season {}): {} players, {} records, {} skipped",
            dir.display(),
            players.season.as_deref().unwrap_or("unknown"),
            summaries.len(),
            records.len(),
            skipped
        );

        Ok(Self { summaries, records })
    }

    /// Like [`SnapshotSource::load`], but an unreadable snapshot becomes an empty one
    pub fn load_or_empty(dir: &Path) -> Self {
        match Self::load(dir) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(
                    "No usable roster snapshot in {}: {}; running without fallback",
                    dir.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Builds a snapshot directly from validated records
    pub fn from_records(records: Vec<EntityRecord>) -> Self {
        let summaries = records.iter().map(EntityRecord::summary).collect();
        let records = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        Self { summaries, records }
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Writes both snapshot files into `dir`, creating it if needed
    pub fn write(
        dir: &Path,
        season: Option<&str>,
        listings: Vec<PlayerListing>,
        records: &[EntityRecord],
    ) -> SourceResult<()> {
        fs::create_dir_all(dir)?;
        let last_updated = Some(chrono::Local::now().to_rfc3339());

        let players = PlayersFile {
            season: season.map(str::to_string),
            players: listings,
            last_updated: last_updated.clone(),
        };
        fs::write(dir.join(PLAYERS_FILE), serde_json::to_string_pretty(&players)?)?;

        let details = DetailsFile {
            last_updated,
            players: records
                .iter()
                .map(|record| {
                    (
                        record.id.to_string(),
                        SnapshotPlayer::from_record(record, season),
                    )
                })
                .collect(),
        };
        fs::write(dir.join(DETAILS_FILE), serde_json::to_string_pretty(&details)?)?;

        Ok(())
    }
}

#[async_trait]
impl RosterSource for SnapshotSource {
    fn name(&self) -> &'static str {
        "snapshot"
    }

    async fn roster(&self) -> SourceResult<Vec<EntitySummary>> {
        if self.summaries.is_empty() {
            return Err(SourceError::Empty);
        }
        Ok(self.summaries.clone())
    }

    async fn record(&self, id: EntityId) -> SourceResult<Option<EntityRecord>> {
        Ok(self.records.get(&id).cloned())
    }
}
