use crate::error::{GameError, Result};
use crate::roster::RosterResolver;
use crate::session::SessionStore;
use log::info;
use shared::{EntityId, EntitySummary, GuessOutcome, SessionId, SessionView, DEFAULT_MAX_GUESSES};
use std::sync::Arc;

/// Entry point request handlers call into: start, guess, search, inspect.
///
/// Holds the roster resolver and the session store as injected
/// dependencies; both live as long as the process.
pub struct GameOrchestrator {
    roster: Arc<RosterResolver>,
    sessions: Arc<SessionStore>,
    max_guesses: u32,
}

impl GameOrchestrator {
    pub fn new(roster: Arc<RosterResolver>, sessions: Arc<SessionStore>, max_guesses: u32) -> Self {
        Self {
            roster,
            sessions,
            max_guesses: max_guesses.max(1),
        }
    }

    pub fn with_defaults(roster: Arc<RosterResolver>) -> Self {
        Self::new(roster, Arc::new(SessionStore::new()), DEFAULT_MAX_GUESSES)
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn start_game(&self) -> Result<SessionId> {
        let target = self.roster.pick_random().await?;
        let session_id = self.sessions.create(target, self.max_guesses).await;

        info!("Started game {}", session_id);
        Ok(session_id)
    }

    /// Resolves the guessed player and submits it.
    ///
    /// Session state is checked before the roster is consulted, so a guess
    /// against a missing or finished game never triggers an upstream call.
    pub async fn make_guess(
        &self,
        session_id: &SessionId,
        entity_id: EntityId,
    ) -> Result<GuessOutcome> {
        self.sessions.ensure_active(session_id).await?;

        let guessed = match self.roster.resolve(entity_id).await {
            Ok(record) => record,
            Err(GameError::EntityNotFound(id)) => return Err(GameError::InvalidPlayer(id)),
            Err(e) => return Err(e),
        };

        self.sessions.submit_guess(session_id, guessed).await
    }

    pub async fn search_players(
        &self,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<EntitySummary>> {
        self.roster.search(query, limit).await
    }

    pub async fn get_session(&self, session_id: &SessionId) -> Result<SessionView> {
        self.sessions.get(session_id).await
    }
}
