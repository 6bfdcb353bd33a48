//! HTTP client for the live roster provider

use super::normalize::{age_on, parse_jersey, RawPlayer};
use super::source::RosterSource;
use crate::config::image_url;
use crate::error::{SourceError, SourceResult};
use async_trait::async_trait;
use log::debug;
use serde::{Deserialize, Serialize};
use shared::{EntityId, EntityRecord, EntitySummary};
use std::time::Duration;

/// Roster listing entry, shared with the snapshot's `players_cache.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PlayerListing {
    pub person_id: EntityId,
    pub display_first_last: String,
    #[serde(default)]
    pub team_abbreviation: Option<String>,
}

impl PlayerListing {
    pub fn summary(&self) -> EntitySummary {
        EntitySummary {
            id: self.person_id,
            name: self.display_first_last.trim().to_string(),
            team: self.team_abbreviation.clone().unwrap_or_default(),
            image_url: Some(image_url(self.person_id)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    players: Vec<PlayerListing>,
}

/// Player detail payload as served upstream
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct UpstreamPlayer {
    pub person_id: EntityId,
    pub display_first_last: String,
    #[serde(default)]
    pub team_name: Option<String>,
    #[serde(default)]
    pub team_abbreviation: Option<String>,
    #[serde(default)]
    pub team_division: Option<String>,
    #[serde(default)]
    pub team_conference: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub jersey: Option<String>,
    #[serde(default)]
    pub ppg: Option<f64>,
}

impl UpstreamPlayer {
    /// Flattens the payload, deriving age from the birthdate as of `today`
    pub fn into_raw(self, today: chrono::NaiveDate) -> RawPlayer {
        RawPlayer {
            id: self.person_id,
            name: self.display_first_last,
            team: self.team_name.unwrap_or_default(),
            team_abbreviation: self.team_abbreviation.unwrap_or_default(),
            division: self.team_division.unwrap_or_default(),
            conference: self.team_conference.unwrap_or_default(),
            age: self
                .birthdate
                .as_deref()
                .and_then(|birthdate| age_on(birthdate, today)),
            height: self.height.unwrap_or_default(),
            position: self.position.unwrap_or_default(),
            jersey_number: self.jersey.as_deref().and_then(parse_jersey),
            ppg: self.ppg.unwrap_or(0.0),
            image_url: Some(image_url(self.person_id)),
        }
    }
}

pub struct LiveSource {
    base_url: String,
    http: reqwest::Client,
}

impl LiveSource {
    pub fn new(base_url: &str, timeout: Duration) -> SourceResult<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Raw roster listing, as stored in the snapshot
    pub async fn fetch_listings(&self) -> SourceResult<Vec<PlayerListing>> {
        let url = format!("{}/players", self.base_url);
        debug!("Fetching roster from {}", url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let roster: RosterResponse = serde_json::from_str(&body)?;
        Ok(roster.players)
    }

    async fn fetch_player(&self, id: EntityId) -> SourceResult<Option<UpstreamPlayer>> {
        let url = format!("{}/players/{}", self.base_url, id);
        debug!("Fetching player {} from {}", id, url);

        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        Ok(Some(serde_json::from_str(&body)?))
    }
}

#[async_trait]
impl RosterSource for LiveSource {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn roster(&self) -> SourceResult<Vec<EntitySummary>> {
        let listings = self.fetch_listings().await?;
        Ok(listings.iter().map(PlayerListing::summary).collect())
    }

    async fn record(&self, id: EntityId) -> SourceResult<Option<EntityRecord>> {
        let Some(player) = self.fetch_player(id).await? else {
            return Ok(None);
        };

        let today = chrono::Local::now().date_naive();
        player.into_raw(today).into_record().map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PLAYER_JSON: &str = r#"{
        "PERSON_ID": 2544,
        "DISPLAY_FIRST_LAST": "LeBron James",
        "TEAM_NAME": "Lakers",
        "TEAM_ABBREVIATION": "LAL",
        "TEAM_DIVISION": "Pacific",
        "TEAM_CONFERENCE": "West",
        "BIRTHDATE": "1984-12-30T00:00:00",
        "HEIGHT": "6-9",
        "POSITION": "Forward",
        "JERSEY": "23",
        "PPG": 25.66
    }"#;

    #[test]
    fn test_upstream_player_decodes_and_normalizes() {
        let player: UpstreamPlayer = serde_json::from_str(PLAYER_JSON).unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        let record = player.into_raw(today).into_record().unwrap();
        assert_eq!(record.id, 2544);
        assert_eq!(record.age, 40);
        assert_eq!(record.height_inches, 81);
        assert_eq!(record.jersey_number, 23);
        assert_eq!(record.team_abbreviation, "LAL");
        assert_eq!(
            record.image_url.as_deref(),
            Some("https://cdn.nba.com/headshots/nba/latest/1040x760/2544.png")
        );
    }

    #[test]
    fn test_upstream_player_without_jersey_is_invalid() {
        let player: UpstreamPlayer = serde_json::from_str(
            r#"{"PERSON_ID": 1, "DISPLAY_FIRST_LAST": "Nobody", "HEIGHT": "6-0"}"#,
        )
        .unwrap();
        let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

        assert!(player.into_raw(today).into_record().is_err());
    }

    #[test]
    fn test_listing_summary() {
        let listing: PlayerListing = serde_json::from_str(
            r#"{"PERSON_ID": 7, "DISPLAY_FIRST_LAST": " Jalen Brunson ",
                "TEAM_ABBREVIATION": "NYK"}"#,
        )
        .unwrap();

        let summary = listing.summary();
        assert_eq!(summary.name, "Jalen Brunson");
        assert_eq!(summary.team, "NYK");
    }

    #[test]
    fn test_base_url_is_trimmed() {
        let source = LiveSource::new("http://localhost:9000/", Duration::from_secs(1)).unwrap();
        assert_eq!(source.base_url, "http://localhost:9000");
    }
}
