//! Two-tier roster resolution
//!
//! Every lookup tries the live provider first. A timeout, an error, or an
//! empty answer sends the same call to the static snapshot instead. Callers
//! never learn which tier answered.
//!
//! Each public operation gets one deadline for all of its live calls, so a
//! stalled provider costs at most one timeout per operation.
//!
//! Live results are memoized for the lifetime of the process, since roster
//! membership does not change while the server runs. Snapshot results are
//! not, so the live tier gets another chance on the next call. Live listings
//! whose record turns out to be unusable are dropped from the memoized index.

pub mod index;
pub mod live;
pub mod normalize;
pub mod snapshot;
pub mod source;

use crate::config::ResolverConfig;
use crate::error::{GameError, Result, SourceError, SourceResult};
use index::RosterIndex;
use live::LiveSource;
use log::{debug, warn};
use shared::{EntityId, EntityRecord, EntitySummary, DEFAULT_SEARCH_LIMIT, MIN_QUERY_LEN};
use snapshot::SnapshotSource;
use source::RosterSource;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Candidates drawn from one index by `pick_random` before moving on
const PICK_ATTEMPTS: usize = 5;

#[derive(Default)]
struct Memo {
    live_index: Option<Arc<RosterIndex>>,
    snapshot_index: Option<Arc<RosterIndex>>,
    records: HashMap<EntityId, EntityRecord>,
}

/// What the live tier said about a record it did not return
#[derive(Debug, Clone, Copy, PartialEq)]
enum LiveMiss {
    /// Answered, but the player is absent or unusable
    Absent,
    /// Timed out or failed
    Unavailable,
    Disabled,
}

pub struct RosterResolver {
    live: Option<Arc<dyn RosterSource>>,
    fallback: Arc<dyn RosterSource>,
    timeout: Duration,
    memo: RwLock<Memo>,
}

impl RosterResolver {
    pub fn new(
        live: Option<Arc<dyn RosterSource>>,
        fallback: Arc<dyn RosterSource>,
        timeout: Duration,
    ) -> Self {
        Self {
            live,
            fallback,
            timeout,
            memo: RwLock::new(Memo::default()),
        }
    }

    /// Builds both tiers from configuration. A bad upstream URL or a missing
    /// snapshot only disables that tier.
    pub fn from_config(config: &ResolverConfig) -> Self {
        let live = config.upstream_url.as_deref().and_then(|url| {
            match LiveSource::new(url, config.upstream_timeout) {
                Ok(source) => Some(Arc::new(source) as Arc<dyn RosterSource>),
                Err(e) => {
                    warn!("Live roster source disabled: {}", e);
                    None
                }
            }
        });

        let fallback = Arc::new(SnapshotSource::load_or_empty(&config.snapshot_dir));

        Self::new(live, fallback, config.upstream_timeout)
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.timeout
    }

    async fn call_live<T, F, Fut>(&self, deadline: Instant, op: F) -> SourceResult<T>
    where
        F: FnOnce(Arc<dyn RosterSource>) -> Fut,
        Fut: Future<Output = SourceResult<T>>,
    {
        let live = self.live.clone().ok_or(SourceError::Disabled)?;
        if Instant::now() >= deadline {
            return Err(SourceError::Timeout(self.timeout));
        }

        match tokio::time::timeout_at(deadline, op(live)).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.timeout)),
        }
    }

    /// Current roster index, from the live tier when possible
    pub async fn roster_index(&self) -> Result<Arc<RosterIndex>> {
        self.roster_index_by(self.deadline()).await
    }

    async fn roster_index_by(&self, deadline: Instant) -> Result<Arc<RosterIndex>> {
        if let Some(index) = self.memo.read().await.live_index.clone() {
            if index.is_empty() {
                return self.snapshot_index().await;
            }
            return Ok(index);
        }

        match self
            .call_live(deadline, |live| async move { live.roster().await })
            .await
        {
            Ok(summaries) => {
                let index = RosterIndex::build(summaries);
                if index.is_empty() {
                    warn!("Live roster was empty; using snapshot");
                } else {
                    let index = Arc::new(index);
                    debug!("Memoized live roster with {} players", index.len());
                    self.memo.write().await.live_index = Some(Arc::clone(&index));
                    return Ok(index);
                }
            }
            Err(SourceError::Disabled) => {}
            Err(e) => warn!("Live roster unavailable ({}); using snapshot", e),
        }

        self.snapshot_index().await
    }

    async fn snapshot_index(&self) -> Result<Arc<RosterIndex>> {
        if let Some(index) = self.memo.read().await.snapshot_index.clone() {
            return Ok(index);
        }

        match self.fallback.roster().await {
            Ok(summaries) if !summaries.is_empty() => {
                let index = Arc::new(RosterIndex::build(summaries));
                self.memo.write().await.snapshot_index = Some(Arc::clone(&index));
                Ok(index)
            }
            Ok(_) => Err(GameError::RosterUnavailable),
            Err(e) => {
                warn!("Snapshot roster unavailable: {}", e);
                Err(GameError::RosterUnavailable)
            }
        }
    }

    /// Removes a listing with no usable record from the memoized live index
    async fn reject(&self, id: EntityId) {
        let mut memo = self.memo.write().await;
        let Some(index) = memo.live_index.clone() else {
            return;
        };

        if index.contains(id) {
            warn!("Dropping player {} from the live roster: no usable record", id);
            memo.live_index = Some(Arc::new(index.without(id)));
        }
    }

    /// Full record for `id`
    pub async fn resolve(&self, id: EntityId) -> Result<EntityRecord> {
        self.resolve_by(id, self.deadline()).await
    }

    async fn resolve_by(&self, id: EntityId, deadline: Instant) -> Result<EntityRecord> {
        if let Some(record) = self.memo.read().await.records.get(&id).cloned() {
            return Ok(record);
        }

        let miss = match self
            .call_live(deadline, |live| async move { live.record(id).await })
            .await
        {
            Ok(Some(record)) => {
                self.memo.write().await.records.insert(id, record.clone());
                return Ok(record);
            }
            Ok(None) => {
                debug!("Player {} absent upstream; checking snapshot", id);
                LiveMiss::Absent
            }
            Err(SourceError::Disabled) => LiveMiss::Disabled,
            Err(e @ SourceError::InvalidRecord { .. }) => {
                warn!("Live record for player {} rejected: {}", id, e);
                LiveMiss::Absent
            }
            Err(e) => {
                warn!("Live lookup of player {} failed ({}); using snapshot", id, e);
                LiveMiss::Unavailable
            }
        };

        match self.fallback.record(id).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => {
                if miss == LiveMiss::Absent {
                    self.reject(id).await;
                }
                Err(GameError::EntityNotFound(id))
            }
            Err(e) if miss == LiveMiss::Unavailable => {
                warn!("Snapshot lookup of player {} failed: {}", id, e);
                Err(GameError::RosterUnavailable)
            }
            Err(e) => {
                warn!("Snapshot lookup of player {} failed: {}", id, e);
                if miss == LiveMiss::Absent {
                    self.reject(id).await;
                }
                Err(GameError::EntityNotFound(id))
            }
        }
    }

    /// Uniformly chosen player with a complete record.
    ///
    /// Draws from the live index first and from the snapshot index once the
    /// live draws are used up.
    pub async fn pick_random(&self) -> Result<EntityRecord> {
        let deadline = self.deadline();

        let index = self.roster_index_by(deadline).await?;
        if let Some(record) = self.draw(&index, deadline).await? {
            return Ok(record);
        }

        let snapshot = self.snapshot_index().await?;
        if !Arc::ptr_eq(&index, &snapshot) {
            if let Some(record) = self.draw(&snapshot, deadline).await? {
                return Ok(record);
            }
        }

        Err(GameError::RosterUnavailable)
    }

    async fn draw(&self, index: &RosterIndex, deadline: Instant) -> Result<Option<EntityRecord>> {
        let mut tried = HashSet::new();

        for attempt in 1..=PICK_ATTEMPTS {
            let Some(candidate) = index.random().map(|summary| summary.id) else {
                break;
            };
            if !tried.insert(candidate) {
                continue;
            }

            match self.resolve_by(candidate, deadline).await {
                Ok(record) => return Ok(Some(record)),
                Err(GameError::EntityNotFound(id)) => {
                    warn!(
                        "Random pick {} has no usable record (attempt {}/{})",
                        id, attempt, PICK_ATTEMPTS
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Ok(None)
    }

    /// Name search; queries shorter than two characters return nothing
    /// without touching either source
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<EntitySummary>> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let index = self.roster_index().await?;
        Ok(index.search(query, limit.unwrap_or(DEFAULT_SEARCH_LIMIT)))
    }
}
