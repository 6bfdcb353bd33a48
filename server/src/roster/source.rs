use crate::error::SourceResult;
use async_trait::async_trait;
use shared::{EntityId, EntityRecord, EntitySummary};

/// One tier of roster data.
///
/// The resolver holds a live implementation and a snapshot implementation
/// behind this trait and decides which one serves each call.
#[async_trait]
pub trait RosterSource: Send + Sync {
    /// Short label used in log lines
    fn name(&self) -> &'static str;

    /// All players this source knows about
    async fn roster(&self) -> SourceResult<Vec<EntitySummary>>;

    /// Full record for `id`, or `None` when the source has no such player
    async fn record(&self, id: EntityId) -> SourceResult<Option<EntityRecord>>;
}
