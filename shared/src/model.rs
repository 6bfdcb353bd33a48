use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable roster key (the upstream person id)
pub type EntityId = u32;

/// Number of guesses a session allows unless configured otherwise
pub const DEFAULT_MAX_GUESSES: u32 = 8;

/// Opaque token identifying one game session
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        SessionId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionGroup {
    Guard,
    Forward,
    Center,
}

/// A playing position that is known to belong to exactly one group.
///
/// Construction goes through [`Position::parse`], so an unrecognized value
/// can never reach the comparison engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Position {
    raw: String,
    group: PositionGroup,
}

impl Position {
    /// Parses a position such as `PG`, `SF`, `Guard` or `Forward-Center`.
    ///
    /// Hyphenated values are split into components. A guard component wins,
    /// then a forward component, then center.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let mut guard = false;
        let mut forward = false;
        let mut center = false;

        for part in raw.split('-') {
            match part.trim().to_ascii_uppercase().as_str() {
                "PG" | "SG" | "G" | "GUARD" => guard = true,
                "SF" | "PF" | "F" | "FORWARD" => forward = true,
                "C" | "CENTER" => center = true,
                _ => return None,
            }
        }

        let group = if guard {
            PositionGroup::Guard
        } else if forward {
            PositionGroup::Forward
        } else if center {
            PositionGroup::Center
        } else {
            return None;
        };

        Some(Self {
            raw: raw.to_string(),
            group,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn group(&self) -> PositionGroup {
        self.group
    }
}

impl TryFrom<String> for Position {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Position::parse(&value).ok_or_else(|| format!("unknown position '{}'", value))
    }
}

impl From<Position> for String {
    fn from(position: Position) -> Self {
        position.raw
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Full comparable attribute set for one roster member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub name: String,
    pub team: String,
    pub team_abbreviation: String,
    pub division: String,
    pub conference: String,
    pub age: u32,
    pub height_inches: u32,
    pub jersey_number: u32,
    pub scoring_rate: f64,
    pub position: Position,
    pub image_url: Option<String>,
}

impl EntityRecord {
    pub fn summary(&self) -> EntitySummary {
        let team = if self.team_abbreviation.is_empty() {
            self.team.clone()
        } else {
            self.team_abbreviation.clone()
        };

        EntitySummary {
            id: self.id,
            name: self.name.clone(),
            team,
            image_url: self.image_url.clone(),
        }
    }
}

/// Lightweight search result entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: EntityId,
    pub name: String,
    pub team: String,
    pub image_url: Option<String>,
}

/// Compared attributes, declared in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AttributeKey {
    Team,
    Division,
    Conference,
    Age,
    Height,
    Position,
    JerseyNumber,
    ScoringRate,
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 8] = [
        AttributeKey::Team,
        AttributeKey::Division,
        AttributeKey::Conference,
        AttributeKey::Age,
        AttributeKey::Height,
        AttributeKey::Position,
        AttributeKey::JerseyNumber,
        AttributeKey::ScoringRate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AttributeKey::Team => "team",
            AttributeKey::Division => "division",
            AttributeKey::Conference => "conference",
            AttributeKey::Age => "age",
            AttributeKey::Height => "height",
            AttributeKey::Position => "position",
            AttributeKey::JerseyNumber => "jersey_number",
            AttributeKey::ScoringRate => "ppg",
        }
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictStatus {
    Correct,
    /// The target's value is higher than the guess
    Higher,
    /// The target's value is lower than the guess
    Lower,
    /// Different position, same position group
    Partial,
    Incorrect,
}

/// Raw attribute value carried alongside a verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Text(String),
    Whole(u32),
    Inches(u32),
    Decimal(f64),
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => f.write_str(text),
            AttributeValue::Whole(value) => write!(f, "{}", value),
            AttributeValue::Inches(inches) => write!(f, "{}-{}", inches / 12, inches % 12),
            AttributeValue::Decimal(value) => write!(f, "{:.1}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub guessed: AttributeValue,
    pub target: AttributeValue,
}

/// Per-attribute verdicts, iterated in [`AttributeKey`] order
pub type Comparison = BTreeMap<AttributeKey, Verdict>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Active,
    Won,
    Lost,
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Active)
    }
}

/// One committed entry in a session's guess history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessRecord {
    pub guessed_entity: EntitySummary,
    pub comparison: Comparison,
    pub guess_number: u32,
    pub is_correct: bool,
}

/// Result of a single accepted guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub guessed_entity: EntityRecord,
    pub comparison: Comparison,
    pub is_correct: bool,
    pub guess_number: u32,
    pub is_game_over: bool,
    pub is_won: bool,
    /// Present only once the game is over
    pub target: Option<EntityRecord>,
}

/// Read-only projection of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub status: GameStatus,
    pub guesses: Vec<GuessRecord>,
    pub guess_count: u32,
    pub max_guesses: u32,
    pub is_game_over: bool,
    pub is_won: bool,
    /// Present only once the game is over
    pub target: Option<EntityRecord>,
}
