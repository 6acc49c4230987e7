//! Metric registry.
//!
//! Collects every entity type's definitions at startup, validates the whole
//! set, and serves lookups read-only from then on. Entity types match
//! case-insensitively so lookups agree with the lowercased ranking key scheme.

use std::collections::HashMap;

use thiserror::Error;

use crate::metric::MetricDefinition;

/// Rejected registrations surface at build time, not at query time.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("metric \"{field_key}\" is registered twice for entity type \"{entity_type}\"")]
    DuplicateMetric {
        entity_type: String,
        field_key: String,
    },

    #[error("metric \"{field_key}\" for entity type \"{entity_type}\" references unregistered field \"{referenced}\"")]
    UnknownReference {
        entity_type: String,
        field_key: String,
        referenced: String,
    },
}

/// Lookup of metric definitions by entity type and field key.
#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: HashMap<String, HashMap<String, MetricDefinition>>,
    rankable: HashMap<String, Vec<String>>,
}

impl MetricRegistry {
    pub fn builder() -> MetricRegistryBuilder {
        MetricRegistryBuilder {
            pending: Vec::new(),
        }
    }

    /// Any registered definition, ranked or display-only.
    pub fn metric(&self, entity_type: &str, field_key: &str) -> Option<&MetricDefinition> {
        self.metrics
            .get(&entity_type.to_lowercase())
            .and_then(|fields| fields.get(field_key))
    }

    /// Definition for a field that keeps a ranking of its own.
    pub fn ranked_metric(&self, entity_type: &str, field_key: &str) -> Option<&MetricDefinition> {
        self.metric(entity_type, field_key)
            .filter(|def| def.rankable)
    }

    /// Field keys that keep rankings for the entity type, in registration order.
    pub fn rankable_fields(&self, entity_type: &str) -> &[String] {
        self.rankable
            .get(&entity_type.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Collects definitions, then validates the whole set in [`build`].
///
/// [`build`]: MetricRegistryBuilder::build
pub struct MetricRegistryBuilder {
    pending: Vec<(String, MetricDefinition)>,
}

impl MetricRegistryBuilder {
    pub fn metric(mut self, entity_type: &str, definition: MetricDefinition) -> Self {
        self.pending.push((entity_type.to_lowercase(), definition));
        self
    }

    /// Registers several definitions for one entity type.
    pub fn metrics<I>(mut self, entity_type: &str, definitions: I) -> Self
    where
        I: IntoIterator<Item = MetricDefinition>,
    {
        for definition in definitions {
            self = self.metric(entity_type, definition);
        }
        self
    }

    /// Fails on duplicate registrations and on `additional_fields` or
    /// `extra_display` references to fields the entity type never registered.
    pub fn build(self) -> Result<MetricRegistry, SchemaError> {
        let mut metrics: HashMap<String, HashMap<String, MetricDefinition>> = HashMap::new();
        let mut rankable: HashMap<String, Vec<String>> = HashMap::new();

        for (entity_type, definition) in self.pending {
            let fields = metrics.entry(entity_type.clone()).or_default();
            if fields.contains_key(&definition.field_key) {
                return Err(SchemaError::DuplicateMetric {
                    entity_type,
                    field_key: definition.field_key,
                });
            }
            if definition.rankable {
                rankable
                    .entry(entity_type)
                    .or_default()
                    .push(definition.field_key.clone());
            }
            fields.insert(definition.field_key.clone(), definition);
        }

        for (entity_type, fields) in &metrics {
            for definition in fields.values() {
                let referenced = definition
                    .additional_fields
                    .iter()
                    .chain(definition.extra_display.iter());
                for reference in referenced {
                    if !fields.contains_key(reference) {
                        return Err(SchemaError::UnknownReference {
                            entity_type: entity_type.clone(),
                            field_key: definition.field_key.clone(),
                            referenced: reference.clone(),
                        });
                    }
                }
            }
        }

        Ok(MetricRegistry { metrics, rankable })
    }
}
