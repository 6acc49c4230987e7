//! Ranking writer.

use std::collections::HashMap;
use std::sync::Arc;

use stat_schema::MetricRegistry;
use tracing::debug;

use crate::error::LeaderboardResult;
use crate::keys::ranking_key;
use crate::models::FieldValue;
use crate::store::{OrderedSetStore, StoreOp};

/// Applies entity stat snapshots to the per-field rankings.
///
/// Each call turns one snapshot into upserts and removes across every affected
/// ranking key and submits them as one atomic batch, so concurrent readers
/// never see a half-applied update.
pub struct RankingWriter {
    registry: Arc<MetricRegistry>,
    store: Arc<dyn OrderedSetStore>,
}

impl RankingWriter {
    pub fn new(registry: Arc<MetricRegistry>, store: Arc<dyn OrderedSetStore>) -> Self {
        RankingWriter { registry, store }
    }

    /// Pushes `values` into the rankings of `entity_type`.
    ///
    /// `fields` restricts the update to a subset of the type's rankable
    /// fields. A zero or NaN value drops the entity from that ranking, since
    /// absent means unranked; text and missing values are skipped. With
    /// `remove` set, every candidate field is dropped regardless of value.
    pub async fn apply_update(
        &self,
        entity_type: &str,
        entity_id: &str,
        values: &HashMap<String, FieldValue>,
        fields: Option<&[String]>,
        remove: bool,
    ) -> LeaderboardResult<()> {
        let ops = build_ops(&self.registry, entity_type, entity_id, values, fields, remove);
        if ops.is_empty() {
            debug!(entity_type, entity_id, "no ranking updates to apply");
            return Ok(());
        }

        debug!(
            entity_type,
            entity_id,
            ops = ops.len(),
            "applying ranking updates"
        );
        self.store.execute_batch(ops).await?;
        Ok(())
    }

    /// Drops the entity from the given rankings, or from every rankable field
    /// of the type when `fields` is `None`.
    pub async fn remove(
        &self,
        entity_type: &str,
        entity_id: &str,
        fields: Option<&[String]>,
    ) -> LeaderboardResult<()> {
        self.apply_update(entity_type, entity_id, &HashMap::new(), fields, true)
            .await
    }
}

fn build_ops(
    registry: &MetricRegistry,
    entity_type: &str,
    entity_id: &str,
    values: &HashMap<String, FieldValue>,
    fields: Option<&[String]>,
    remove: bool,
) -> Vec<StoreOp> {
    let mut ops = Vec::new();
    for field_key in registry.rankable_fields(entity_type) {
        if let Some(selected) = fields {
            if !selected.iter().any(|field| field == field_key) {
                continue;
            }
        }

        let key = ranking_key(entity_type, field_key);
        if remove {
            // Removal ignores the value entirely, text fields included.
            ops.push(StoreOp::Remove {
                key,
                member: entity_id.to_string(),
            });
            continue;
        }

        match values.get(field_key) {
            Some(FieldValue::Number(score)) if *score == 0.0 || score.is_nan() => {
                // Zero and NaN mean unranked.
                ops.push(StoreOp::Remove {
                    key,
                    member: entity_id.to_string(),
                });
            }
            Some(FieldValue::Number(score)) => {
                ops.push(StoreOp::Upsert {
                    key,
                    member: entity_id.to_string(),
                    score: *score,
                });
            }
            // Text and missing values never touch the ranking.
            Some(FieldValue::Text(_)) | None => {}
        }
    }
    ops
}
