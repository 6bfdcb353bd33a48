pub mod compare;
pub mod model;

use serde::{Deserialize, Serialize};

pub use compare::compare;
pub use model::*;

/// Fewest characters a search query needs before the roster is scanned
pub const MIN_QUERY_LEN: usize = 2;
pub const DEFAULT_SEARCH_LIMIT: usize = 10;
pub const MAX_SEARCH_LIMIT: usize = 20;

/// Largest datagram either side will read
pub const MAX_PACKET_SIZE: usize = 65_507;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    StartGame {
        request_id: u64,
    },
    SearchPlayers {
        request_id: u64,
        query: String,
        limit: Option<u32>,
    },
    Guess {
        request_id: u64,
        session_id: SessionId,
        entity_id: EntityId,
    },
    GetSession {
        request_id: u64,
        session_id: SessionId,
    },
    Ping {
        request_id: u64,
    },

    GameStarted {
        request_id: u64,
        session_id: SessionId,
    },
    SearchResults {
        request_id: u64,
        players: Vec<EntitySummary>,
    },
    GuessResult {
        request_id: u64,
        outcome: GuessOutcome,
    },
    SessionState {
        request_id: u64,
        view: SessionView,
    },
    Pong {
        request_id: u64,
    },
    Error {
        request_id: u64,
        kind: ErrorKind,
        message: String,
    },
}

impl Packet {
    pub fn request_id(&self) -> u64 {
        match self {
            Packet::StartGame { request_id }
            | Packet::SearchPlayers { request_id, .. }
            | Packet::Guess { request_id, .. }
            | Packet::GetSession { request_id, .. }
            | Packet::Ping { request_id }
            | Packet::GameStarted { request_id, .. }
            | Packet::SearchResults { request_id, .. }
            | Packet::GuessResult { request_id, .. }
            | Packet::SessionState { request_id, .. }
            | Packet::Pong { request_id }
            | Packet::Error { request_id, .. } => *request_id,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(
            self,
            Packet::StartGame { .. }
                | Packet::SearchPlayers { .. }
                | Packet::Guess { .. }
                | Packet::GetSession { .. }
                | Packet::Ping { .. }
        )
    }
}

/// Tagged failure reported to clients
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SessionNotFound,
    GameAlreadyOver,
    DuplicateGuess,
    InvalidPlayer,
    RosterUnavailable,
    BadRequest,
}

/// Coarse status family a boundary maps each [`ErrorKind`] onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    NotFound,
    ClientError,
    ServiceUnavailable,
}

impl ErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::SessionNotFound => ErrorClass::NotFound,
            ErrorKind::GameAlreadyOver
            | ErrorKind::DuplicateGuess
            | ErrorKind::InvalidPlayer
            | ErrorKind::BadRequest => ErrorClass::ClientError,
            ErrorKind::RosterUnavailable => ErrorClass::ServiceUnavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use bincode::{deserialize, serialize};

    fn sample_record() -> EntityRecord {
        EntityRecord {
            id: 2544,
            name: "LeBron James".to_string(),
            team: "Los Angeles Lakers".to_string(),
            team_abbreviation: "LAL".to_string(),
            division: "Pacific".to_string(),
            conference: "West".to_string(),
            age: 39,
            height_inches: 81,
            jersey_number: 23,
            scoring_rate: 25.7,
            position: Position::parse("Forward").unwrap(),
            image_url: None,
        }
    }

    #[test]
    fn test_position_groups() {
        let cases = [
            ("PG", PositionGroup::Guard),
            ("sg", PositionGroup::Guard),
            ("G", PositionGroup::Guard),
            ("Guard", PositionGroup::Guard),
            ("SF", PositionGroup::Forward),
            ("PF", PositionGroup::Forward),
            ("Forward", PositionGroup::Forward),
            ("C", PositionGroup::Center),
            ("Center", PositionGroup::Center),
            ("Guard-Forward", PositionGroup::Guard),
            ("Forward-Guard", PositionGroup::Guard),
            ("Forward-Center", PositionGroup::Forward),
            ("Center-Forward", PositionGroup::Forward),
        ];

        for (raw, group) in cases {
            let position = Position::parse(raw).unwrap();
            assert_eq!(position.group(), group, "position {}", raw);
        }
    }

    #[test]
    fn test_position_rejects_unknown_values() {
        assert!(Position::parse("").is_none());
        assert!(Position::parse("   ").is_none());
        assert!(Position::parse("Goalkeeper").is_none());
        assert!(Position::parse("Guard-").is_none());
    }

    #[test]
    fn test_summary_prefers_abbreviation() {
        let record = sample_record();
        let summary = record.summary();
        assert_eq!(summary.team, "LAL");

        let mut free_agent = sample_record();
        free_agent.team_abbreviation.clear();
        assert_eq!(free_agent.summary().team, "Los Angeles Lakers");
    }

    #[test]
    fn test_error_kind_classes() {
        assert_eq!(ErrorKind::SessionNotFound.class(), ErrorClass::NotFound);
        assert_eq!(ErrorKind::DuplicateGuess.class(), ErrorClass::ClientError);
        assert_eq!(ErrorKind::GameAlreadyOver.class(), ErrorClass::ClientError);
        assert_eq!(ErrorKind::InvalidPlayer.class(), ErrorClass::ClientError);
        assert_eq!(
            ErrorKind::RosterUnavailable.class(),
            ErrorClass::ServiceUnavailable
        );
    }

    #[test]
    fn test_guess_result_survives_the_wire() {
        let record = sample_record();
        let outcome = GuessOutcome {
            guessed_entity: record.clone(),
            comparison: compare(&record, &record),
            is_correct: true,
            guess_number: 3,
            is_game_over: true,
            is_won: true,
            target: Some(record),
        };
        let packet = Packet::GuessResult {
            request_id: 9,
            outcome,
        };

        let bytes = serialize(&packet).unwrap();
        assert!(bytes.len() < MAX_PACKET_SIZE);

        match deserialize::<Packet>(&bytes).unwrap() {
            Packet::GuessResult { request_id, outcome } => {
                assert_eq!(request_id, 9);
                assert_eq!(outcome.comparison.len(), AttributeKey::ALL.len());
                let target = outcome.target.unwrap();
                assert_approx_eq!(target.scoring_rate, 25.7);
                assert_eq!(target.position.group(), PositionGroup::Forward);
            }
            other => panic!("Unexpected packet {:?}", other),
        }
    }

    #[test]
    fn test_request_classification() {
        let ping = Packet::Ping { request_id: 4 };
        assert!(ping.is_request());
        assert_eq!(ping.request_id(), 4);

        let pong = Packet::Pong { request_id: 4 };
        assert!(!pong.is_request());
    }
}
