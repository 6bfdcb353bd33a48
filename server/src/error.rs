//! Error types for roster resolution and game play

use shared::{EntityId, ErrorKind, SessionId};
use std::time::Duration;
use thiserror::Error;

/// Failures from a single roster source call.
///
/// These never reach callers of the resolver directly: the live tier's
/// failures trigger the snapshot, and only a double failure is surfaced.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source timed out after {0:?}")]
    Timeout(Duration),

    #[error("source is not configured")]
    Disabled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("source returned no players")]
    Empty,

    #[error("record {id} is unusable: {reason}")]
    InvalidRecord { id: EntityId, reason: String },
}

pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Errors surfaced by the game engine to request handlers
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("roster is unavailable from both live and snapshot sources")]
    RosterUnavailable,

    #[error("player {0} not found")]
    EntityNotFound(EntityId),

    #[error("invalid player {0}")]
    InvalidPlayer(EntityId),

    #[error("game {0} not found")]
    SessionNotFound(SessionId),

    #[error("game {0} is already over")]
    GameAlreadyOver(SessionId),

    #[error("player {entity_id} was already guessed in game {session_id}")]
    DuplicateGuess {
        session_id: SessionId,
        entity_id: EntityId,
    },
}

impl GameError {
    /// Wire tag for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::RosterUnavailable => ErrorKind::RosterUnavailable,
            GameError::EntityNotFound(_) | GameError::InvalidPlayer(_) => ErrorKind::InvalidPlayer,
            GameError::SessionNotFound(_) => ErrorKind::SessionNotFound,
            GameError::GameAlreadyOver(_) => ErrorKind::GameAlreadyOver,
            GameError::DuplicateGuess { .. } => ErrorKind::DuplicateGuess,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
