//! Ranking reader.

use std::sync::Arc;

use stat_schema::{prettify, Formatter, MetricDefinition, MetricRegistry};
use tracing::debug;

use crate::error::{LeaderboardError, LeaderboardResult, StoreError};
use crate::keys::ranking_key;
use crate::models::{
    DisplayRecord, FieldRank, FieldValue, LeaderboardPage, LeaderboardQuery, LeaderboardRow,
};
use crate::resolvers::{DisplayDataResolver, InputResolver};
use crate::store::{OrderedSetStore, ScoredMember, StoreOp, StoreOpResult};

/// Rows per leaderboard page.
pub const PAGE_SIZE: u64 = 10;

/// In-game format reset code, joined between an extra display value and the
/// entity name.
pub const FORMAT_RESET: &str = "§r";

/// Answers leaderboard queries: windowed pages in three addressing modes and
/// per-entity rank lookups.
pub struct RankingReader {
    registry: Arc<MetricRegistry>,
    store: Arc<dyn OrderedSetStore>,
    display: Arc<dyn DisplayDataResolver>,
    input: Arc<dyn InputResolver>,
}

impl RankingReader {
    pub fn new(
        registry: Arc<MetricRegistry>,
        store: Arc<dyn OrderedSetStore>,
        display: Arc<dyn DisplayDataResolver>,
        input: Arc<dyn InputResolver>,
    ) -> Self {
        RankingReader {
            registry,
            store,
            display,
            input,
        }
    }

    /// Resolves `query` to a ten-row window of the `(entity_type, field_key)`
    /// ranking and joins display data for every row in one batched call.
    ///
    /// `Input` and `Position` queries snap to the page boundary containing
    /// the target rank, so the target row always sits inside a full page and
    /// comes back marked `highlighted`.
    pub async fn get_leaderboard(
        &self,
        entity_type: &str,
        field_key: &str,
        query: &LeaderboardQuery,
    ) -> LeaderboardResult<LeaderboardPage> {
        let metric = self.ranked_metric(entity_type, field_key)?;

        // Window start (0-based) and the 0-based rank to highlight, if any.
        let (top, highlight) = match query {
            LeaderboardQuery::Page(page) => (page * PAGE_SIZE, None),
            LeaderboardQuery::Position(rank) => {
                let position = rank.saturating_sub(1);
                (snap_to_page(position), Some(position))
            }
            LeaderboardQuery::Input(text) => {
                let rank = self
                    .input
                    .resolve_rank(entity_type, field_key, text)
                    .await?
                    .ok_or_else(|| LeaderboardError::InputNotFound(text.clone()))?;
                let position = rank.saturating_sub(1);
                (snap_to_page(position), Some(position))
            }
        };

        let key = ranking_key(entity_type, field_key);
        let entries = self
            .store
            .range_by_rank(&key, top, top + PAGE_SIZE - 1, metric.sort)
            .await?;
        debug!(key = %key, top, rows = entries.len(), "fetched ranking window");

        let columns = self.columns(entity_type, metric);
        let page = top / PAGE_SIZE;
        if entries.is_empty() {
            return Ok(LeaderboardPage {
                name: metric.name.clone(),
                columns,
                rows: Vec::new(),
                page,
            });
        }

        let ids: Vec<String> = entries.iter().map(|entry| entry.member.clone()).collect();
        let requested = requested_fields(metric);
        let records = self.display.fetch_display_data(&ids, &requested).await?;
        if records.len() != ids.len() {
            return Err(LeaderboardError::ResolverMismatch(format!(
                "asked for {} display records, got {}",
                ids.len(),
                records.len()
            )));
        }

        let mut rows = Vec::with_capacity(entries.len());
        for (offset, (entry, record)) in entries.into_iter().zip(records).enumerate() {
            let rank = top + offset as u64;
            rows.push(self.build_row(entity_type, metric, entry, record, rank, highlight)?);
        }

        Ok(LeaderboardPage {
            name: metric.name.clone(),
            columns,
            rows,
            page,
        })
    }

    /// Looks up the entity's 1-based rank on each requested field in one
    /// atomic batch. An entity absent from a ranking reports rank `0`.
    pub async fn get_ranks(
        &self,
        entity_type: &str,
        field_keys: &[&str],
        entity_id: &str,
    ) -> LeaderboardResult<Vec<FieldRank>> {
        let mut ops = Vec::with_capacity(field_keys.len());
        for field_key in field_keys {
            let metric = self.ranked_metric(entity_type, field_key)?;
            ops.push(StoreOp::RankOf {
                key: ranking_key(entity_type, field_key),
                member: entity_id.to_string(),
                order: metric.sort,
            });
        }
        if ops.is_empty() {
            return Ok(Vec::new());
        }

        let results = self.store.execute_batch(ops).await?;
        field_keys
            .iter()
            .zip(results)
            .map(|(field_key, result)| match result {
                StoreOpResult::Rank(stored) => Ok(FieldRank {
                    field_key: field_key.to_string(),
                    rank: stored.map_or(0, |rank| rank + 1),
                }),
                StoreOpResult::Done => Err(LeaderboardError::Store(StoreError::InvalidReply(
                    "rank lookup reply carried no rank".to_string(),
                ))),
            })
            .collect()
    }

    fn ranked_metric(
        &self,
        entity_type: &str,
        field_key: &str,
    ) -> LeaderboardResult<&MetricDefinition> {
        self.registry
            .ranked_metric(entity_type, field_key)
            .ok_or_else(|| LeaderboardError::UnknownMetric {
                entity_type: entity_type.to_string(),
                field_key: field_key.to_string(),
            })
    }

    /// Column headers mirror the per-row field list: the primary metric
    /// (omitted when hidden) followed by each additional field.
    fn columns(&self, entity_type: &str, metric: &MetricDefinition) -> Vec<String> {
        let mut columns = Vec::with_capacity(1 + metric.additional_fields.len());
        if !metric.hidden {
            columns.push(metric.short_name.clone());
        }
        for field_key in &metric.additional_fields {
            let column = self
                .registry
                .metric(entity_type, field_key)
                .map(|def| def.short_name.clone())
                .unwrap_or_else(|| prettify(field_key));
            columns.push(column);
        }
        columns
    }

    fn formatter_for(&self, entity_type: &str, field_key: &str) -> Option<Formatter> {
        self.registry
            .metric(entity_type, field_key)
            .and_then(|def| def.formatter)
    }

    fn build_row(
        &self,
        entity_type: &str,
        metric: &MetricDefinition,
        entry: ScoredMember,
        record: DisplayRecord,
        rank: u64,
        highlight: Option<u64>,
    ) -> LeaderboardResult<LeaderboardRow> {
        let mut fields = Vec::with_capacity(1 + metric.additional_fields.len());
        if !metric.hidden {
            fields.push(match metric.formatter {
                Some(format) => FieldValue::Text(format(entry.score)),
                None => FieldValue::Number(entry.score),
            });
        }
        for field_key in &metric.additional_fields {
            let value = display_field(&record, field_key)?;
            fields.push(match (self.formatter_for(entity_type, field_key), value) {
                (Some(format), FieldValue::Number(number)) => FieldValue::Text(format(number)),
                (_, value) => value,
            });
        }

        let name = match &metric.extra_display {
            Some(extra_key) => {
                let extra = display_field(&record, extra_key)?;
                format!("{}{} {}", extra, FORMAT_RESET, record.name)
            }
            None => record.name,
        };

        Ok(LeaderboardRow {
            entity_id: entry.member,
            name,
            fields,
            position: rank + 1,
            highlighted: highlight == Some(rank),
        })
    }
}

fn snap_to_page(position: u64) -> u64 {
    position - position % PAGE_SIZE
}

/// Field keys to request from the display resolver: the additional fields in
/// declaration order, then `extra_display` unless already among them.
fn requested_fields(metric: &MetricDefinition) -> Vec<String> {
    let mut fields = metric.additional_fields.clone();
    if let Some(extra_key) = &metric.extra_display {
        if !fields.contains(extra_key) {
            fields.push(extra_key.clone());
        }
    }
    fields
}

fn display_field(record: &DisplayRecord, field_key: &str) -> LeaderboardResult<FieldValue> {
    record.fields.get(field_key).cloned().ok_or_else(|| {
        LeaderboardError::ResolverMismatch(format!(
            "display record missing requested field \"{field_key}\""
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stat_schema::SortOrder;
    use std::collections::HashMap;

    #[test]
    fn test_snap_lands_on_page_boundaries() {
        assert_eq!(snap_to_page(0), 0);
        assert_eq!(snap_to_page(6), 0);
        assert_eq!(snap_to_page(9), 0);
        assert_eq!(snap_to_page(10), 10);
        assert_eq!(snap_to_page(24), 20);
    }

    #[test]
    fn test_requested_fields_appends_extra_display_once() {
        let base = MetricDefinition::ranked("wins", SortOrder::Descending)
            .with_additional_fields(["losses", "wlr"]);

        assert_eq!(requested_fields(&base), vec!["losses", "wlr"]);
        assert_eq!(
            requested_fields(&base.clone().with_extra_display("wlr")),
            vec!["losses", "wlr"]
        );
        assert_eq!(
            requested_fields(&base.with_extra_display("level")),
            vec!["losses", "wlr", "level"]
        );
    }

    #[test]
    fn test_display_field_missing_key_is_a_mismatch() {
        let record = DisplayRecord {
            name: "Steve".to_string(),
            fields: HashMap::new(),
        };

        let err = display_field(&record, "wlr").unwrap_err();
        assert!(matches!(err, LeaderboardError::ResolverMismatch(_)));
    }
}
