//! Session lifecycle and guess bookkeeping for the game server
//!
//! This module owns every game session, including:
//! - Session allocation with unguessable, never-reused ids
//! - The Active → Won / Active → Lost state machine
//! - Duplicate-guess rejection and append-only guess history
//! - Reveal of the target only once a session is over
//!
//! Guesses against one session are serialized by a per-session lock. The
//! duplicate check, the comparison, the history append and the status
//! transition all run inside that lock with no await point in between, so a
//! dropped request either committed completely or left no trace.

use crate::error::{GameError, Result};
use log::{debug, info};
use shared::{
    compare, EntityId, EntityRecord, GameStatus, GuessOutcome, GuessRecord, SessionId,
    SessionView,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, RwLock};

/// A single game: the hidden target and everything guessed so far
#[derive(Debug)]
pub struct GameSession {
    pub id: SessionId,
    /// Fixed at creation, never mutated
    target: EntityRecord,
    guesses: Vec<GuessRecord>,
    status: GameStatus,
    max_guesses: u32,
    pub created_at: Instant,
}

impl GameSession {
    pub fn new(id: SessionId, target: EntityRecord, max_guesses: u32) -> Self {
        Self {
            id,
            target,
            guesses: Vec::new(),
            status: GameStatus::Active,
            max_guesses: max_guesses.max(1),
            created_at: Instant::now(),
        }
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn guess_count(&self) -> u32 {
        self.guesses.len() as u32
    }

    /// Guesses are matched by entity id only
    pub fn has_guessed(&self, entity_id: EntityId) -> bool {
        self.guesses
            .iter()
            .any(|guess| guess.guessed_entity.id == entity_id)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.status.is_terminal() {
            return Err(GameError::GameAlreadyOver(self.id.clone()));
        }
        Ok(())
    }

    /// Applies one guess as a single step of the state machine.
    ///
    /// Rejections happen before anything is computed or recorded.
    pub fn apply_guess(&mut self, guessed: EntityRecord) -> Result<GuessOutcome> {
        self.ensure_active()?;

        if self.has_guessed(guessed.id) {
            return Err(GameError::DuplicateGuess {
                session_id: self.id.clone(),
                entity_id: guessed.id,
            });
        }

        let comparison = compare(&guessed, &self.target);
        let guess_number = self.guess_count() + 1;
        let is_correct = guessed.id == self.target.id;

        self.guesses.push(GuessRecord {
            guessed_entity: guessed.summary(),
            comparison: comparison.clone(),
            guess_number,
            is_correct,
        });

        if is_correct {
            self.status = GameStatus::Won;
        } else if guess_number >= self.max_guesses {
            self.status = GameStatus::Lost;
        }

        let is_game_over = self.status.is_terminal();
        if is_game_over {
            info!(
                "Game {} ended: {:?} after {} guesses",
                self.id, self.status, guess_number
            );
        }

        Ok(GuessOutcome {
            guessed_entity: guessed,
            comparison,
            is_correct,
            guess_number,
            is_game_over,
            is_won: self.status == GameStatus::Won,
            target: self.revealed_target(),
        })
    }

    fn revealed_target(&self) -> Option<EntityRecord> {
        if self.status.is_terminal() {
            Some(self.target.clone())
        } else {
            None
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            status: self.status,
            guesses: self.guesses.clone(),
            guess_count: self.guess_count(),
            max_guesses: self.max_guesses,
            is_game_over: self.status.is_terminal(),
            is_won: self.status == GameStatus::Won,
            target: self.revealed_target(),
        }
    }
}

/// Owns all sessions for the lifetime of the process
///
/// The map itself is behind a read/write lock; each session has its own
/// mutex so play in one game never waits on another.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<GameSession>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new Active session and returns its id
    pub async fn create(&self, target: EntityRecord, max_guesses: u32) -> SessionId {
        let mut sessions = self.sessions.write().await;

        let id = loop {
            let candidate = SessionId(format!("{:032x}", rand::random::<u128>()));
            if !sessions.contains_key(&candidate) {
                break candidate;
            }
        };

        debug!("Allocated game {} ({} total)", id, sessions.len() + 1);
        let session = GameSession::new(id.clone(), target, max_guesses);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));

        id
    }

    async fn session(&self, id: &SessionId) -> Result<Arc<Mutex<GameSession>>> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GameError::SessionNotFound(id.clone()))
    }

    /// Records a guess, waiting for any in-flight guess on the same session
    pub async fn submit_guess(
        &self,
        id: &SessionId,
        guessed: EntityRecord,
    ) -> Result<GuessOutcome> {
        let session = self.session(id).await?;
        let mut session = session.lock().await;
        session.apply_guess(guessed)
    }

    /// Fails unless the session exists and is still Active
    pub async fn ensure_active(&self, id: &SessionId) -> Result<()> {
        let session = self.session(id).await?;
        let session = session.lock().await;
        session.ensure_active()
    }

    pub async fn get(&self, id: &SessionId) -> Result<SessionView> {
        let session = self.session(id).await?;
        let view = session.lock().await.view();
        Ok(view)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Number of sessions still in play
    pub async fn active_count(&self) -> usize {
        let sessions: Vec<Arc<Mutex<GameSession>>> =
            self.sessions.read().await.values().cloned().collect();

        let mut active = 0;
        for session in sessions {
            if session.lock().await.status() == GameStatus::Active {
                active += 1;
            }
        }
        active
    }
}

/// Session state machine tests: transitions, duplicate rejection, reveal
/// rules and serialization of concurrent guesses.
#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::tests::record;
    use shared::{AttributeKey, VerdictStatus};
    use std::collections::HashSet;
    use tokio_test::{assert_err, assert_ok};

    fn target() -> EntityRecord {
        record(1, "Target Player")
    }

    #[tokio::test]
    async fn test_create_starts_active_and_empty() {
        let store = SessionStore::new();
        let id = store.create(target(), 8).await;

        assert_eq!(id.as_str().len(), 32);
        let view = store.get(&id).await.unwrap();
        assert_eq!(view.status, GameStatus::Active);
        assert!(view.guesses.is_empty());
        assert_eq!(view.max_guesses, 8);
        assert!(view.target.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = SessionStore::new();
        let mut ids = HashSet::new();
        for _ in 0..100 {
            ids.insert(store.create(target(), 8).await);
        }
        assert_eq!(ids.len(), 100);
    }

    #[tokio::test]
    async fn test_unknown_session() {
        let store = SessionStore::new();
        let missing = SessionId::from("missing");

        assert_eq!(
            store.get(&missing).await,
            Err(GameError::SessionNotFound(missing.clone()))
        );
        assert_eq!(
            store.submit_guess(&missing, record(2, "Someone")).await,
            Err(GameError::SessionNotFound(missing))
        );
    }

    #[tokio::test]
    async fn test_correct_guess_wins_and_reveals() {
        let store = SessionStore::new();
        let id = store.create(target(), 8).await;

        let miss = store.submit_guess(&id, record(2, "Miss")).await.unwrap();
        assert!(!miss.is_correct);
        assert!(!miss.is_game_over);
        assert!(miss.target.is_none());
        assert_eq!(miss.guess_number, 1);

        let hit = store.submit_guess(&id, target()).await.unwrap();
        assert!(hit.is_correct);
        assert!(hit.is_won);
        assert!(hit.is_game_over);
        assert_eq!(hit.guess_number, 2);
        assert_eq!(hit.target, Some(target()));
        assert!(hit
            .comparison
            .values()
            .all(|verdict| verdict.status == VerdictStatus::Correct));

        let view = store.get(&id).await.unwrap();
        assert_eq!(view.status, GameStatus::Won);
        assert_eq!(view.target, Some(target()));

        assert_eq!(
            store.submit_guess(&id, record(3, "Late")).await,
            Err(GameError::GameAlreadyOver(id))
        );
    }

    #[tokio::test]
    async fn test_running_out_of_guesses_loses() {
        let store = SessionStore::new();
        let id = store.create(target(), 8).await;

        for n in 1..=8u32 {
            let outcome = store
                .submit_guess(&id, record(100 + n, "Wrong"))
                .await
                .unwrap();
            assert_eq!(outcome.guess_number, n);
            assert_eq!(outcome.is_game_over, n == 8);
            assert_eq!(outcome.target.is_some(), n == 8);
            assert!(!outcome.is_won);
        }

        assert_eq!(store.get(&id).await.unwrap().status, GameStatus::Lost);
        assert_err!(store.submit_guess(&id, target()).await);
        assert_err!(store.ensure_active(&id).await);
    }

    #[tokio::test]
    async fn test_duplicate_guess_rejected_anywhere_in_sequence() {
        let store = SessionStore::new();
        let id = store.create(target(), 8).await;

        assert_ok!(store.submit_guess(&id, record(2, "First")).await);
        assert_ok!(store.submit_guess(&id, record(3, "Second")).await);

        // Same id, different name: still a duplicate
        assert_eq!(
            store.submit_guess(&id, record(2, "Renamed")).await,
            Err(GameError::DuplicateGuess {
                session_id: id.clone(),
                entity_id: 2
            })
        );

        let view = store.get(&id).await.unwrap();
        assert_eq!(view.guess_count, 2);
        assert_eq!(view.status, GameStatus::Active);
    }

    #[tokio::test]
    async fn test_history_keeps_comparisons() {
        let store = SessionStore::new();
        let id = store.create(target(), 8).await;

        store.submit_guess(&id, record(3, "Older")).await.unwrap();

        let view = store.get(&id).await.unwrap();
        let entry = &view.guesses[0];
        assert_eq!(entry.guessed_entity.id, 3);
        assert_eq!(entry.guess_number, 1);
        assert_eq!(
            entry.comparison[&AttributeKey::Age].status,
            VerdictStatus::Lower
        );
    }

    #[tokio::test]
    async fn test_single_guess_budget() {
        let store = SessionStore::new();
        let id = store.create(target(), 1).await;

        let outcome = store.submit_guess(&id, record(2, "Only")).await.unwrap();
        assert!(outcome.is_game_over);
        assert!(!outcome.is_won);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_guesses_are_serialized() {
        let store = Arc::new(SessionStore::new());
        let id = store.create(target(), 8).await;

        let mut handles = Vec::new();
        for n in 0..32u32 {
            let store = Arc::clone(&store);
            let id = id.clone();
            // Every entity is submitted twice
            let entity = 100 + n % 16;
            handles.push(tokio::spawn(async move {
                store.submit_guess(&id, record(entity, "Racer")).await
            }));
        }

        let mut numbers = Vec::new();
        for handle in handles {
            if let Ok(outcome) = handle.await.unwrap() {
                numbers.push(outcome.guess_number);
            }
        }

        numbers.sort_unstable();
        assert_eq!(numbers, (1..=8).collect::<Vec<u32>>());

        let view = store.get(&id).await.unwrap();
        assert_eq!(view.guess_count, 8);
        assert_eq!(view.status, GameStatus::Lost);
        let distinct: HashSet<u32> = view.guesses.iter().map(|g| g.guessed_entity.id).collect();
        assert_eq!(distinct.len(), 8);
    }

    #[tokio::test]
    async fn test_active_count() {
        let store = SessionStore::new();
        let won = store.create(target(), 8).await;
        store.create(target(), 8).await;

        assert_eq!(store.active_count().await, 2);
        store.submit_guess(&won, target()).await.unwrap();
        assert_eq!(store.active_count().await, 1);
    }
}
