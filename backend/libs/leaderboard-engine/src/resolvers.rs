//! Seams to the surrounding platform.
//!
//! Leaderboard pages join ranking windows with display data, and free-text
//! queries get resolved to a rank; both live outside this crate, in the
//! profile store and its search layer. Implementations report failures
//! through `anyhow` so transport details stay out of the engine taxonomy.

use async_trait::async_trait;

use crate::models::DisplayRecord;

/// Batched display-data source for ranked entities.
#[async_trait]
pub trait DisplayDataResolver: Send + Sync {
    /// Returns one record per entity id, in the same order as `entity_ids`,
    /// each carrying the display name and every key in `field_keys`.
    async fn fetch_display_data(
        &self,
        entity_ids: &[String],
        field_keys: &[String],
    ) -> anyhow::Result<Vec<DisplayRecord>>;
}

/// Maps free-text input to the rank it holds on one ranking.
#[async_trait]
pub trait InputResolver: Send + Sync {
    /// 1-based rank of the entity named by `input` on the given ranking, or
    /// `None` when nothing matches.
    async fn resolve_rank(
        &self,
        entity_type: &str,
        field_key: &str,
        input: &str,
    ) -> anyhow::Result<Option<u64>>;
}
