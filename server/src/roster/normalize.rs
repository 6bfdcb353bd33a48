//! Turns loosely-typed player data into validated [`EntityRecord`]s

use crate::error::{SourceError, SourceResult};
use chrono::{Datelike, NaiveDate};
use shared::{EntityId, EntityRecord, Position};

/// Player fields as delivered by a source, before validation
#[derive(Debug, Clone, Default)]
pub struct RawPlayer {
    pub id: EntityId,
    pub name: String,
    pub team: String,
    pub team_abbreviation: String,
    pub division: String,
    pub conference: String,
    pub age: Option<u32>,
    /// `"<feet>-<inches>"`
    pub height: String,
    pub position: String,
    pub jersey_number: Option<u32>,
    pub ppg: f64,
    pub image_url: Option<String>,
}

impl RawPlayer {
    /// Validates every comparable attribute and normalizes units
    pub fn into_record(self) -> SourceResult<EntityRecord> {
        let id = self.id;
        let invalid = |reason: &str| SourceError::InvalidRecord {
            id,
            reason: reason.to_string(),
        };

        let name = required_text(&self.name).ok_or_else(|| invalid("missing name"))?;
        let team_abbreviation = self.team_abbreviation.trim().to_string();
        let team = required_text(&self.team)
            .or_else(|| required_text(&team_abbreviation))
            .unwrap_or_else(|| "Free Agent".to_string());
        let division = required_text(&self.division).ok_or_else(|| invalid("missing division"))?;
        let conference =
            required_text(&self.conference).ok_or_else(|| invalid("missing conference"))?;
        let age = self.age.ok_or_else(|| invalid("missing age"))?;
        let height_inches = parse_height(&self.height)
            .ok_or_else(|| invalid(&format!("unparseable height '{}'", self.height)))?;
        let position = Position::parse(&self.position)
            .ok_or_else(|| invalid(&format!("unknown position '{}'", self.position)))?;
        let jersey_number = self
            .jersey_number
            .ok_or_else(|| invalid("missing jersey number"))?;
        if !self.ppg.is_finite() {
            return Err(invalid("non-finite scoring rate"));
        }

        Ok(EntityRecord {
            id,
            name,
            team,
            team_abbreviation,
            division,
            conference,
            age,
            height_inches,
            jersey_number,
            scoring_rate: round_rate(self.ppg),
            position,
            image_url: self.image_url,
        })
    }
}

fn required_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses `"6-8"` into 80 inches
pub fn parse_height(height: &str) -> Option<u32> {
    let (feet, inches) = height.trim().split_once('-')?;
    let feet: u32 = feet.trim().parse().ok()?;
    let inches: u32 = inches.trim().parse().ok()?;
    if feet == 0 || inches >= 12 {
        return None;
    }
    Some(feet * 12 + inches)
}

/// Parses a jersey string such as `"23"` or `"00"`
pub fn parse_jersey(jersey: &str) -> Option<u32> {
    jersey.trim().parse().ok()
}

/// Whole years between a `YYYY-MM-DD[T...]` birthdate and `today`
pub fn age_on(birthdate: &str, today: NaiveDate) -> Option<u32> {
    let date_part = birthdate.split('T').next()?.trim();
    let born = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()?;
    if born > today {
        return None;
    }

    let mut age = today.year() - born.year();
    if (today.month(), today.day()) < (born.month(), born.day()) {
        age -= 1;
    }
    u32::try_from(age).ok()
}

/// Rounds a points-per-game value to one decimal
pub fn round_rate(rate: f64) -> f64 {
    (rate * 10.0).round() / 10.0
}
