#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use leaderboard_engine::{
    DisplayDataResolver, DisplayRecord, FieldValue, InputResolver, OrderedSetStore, ScoredMember,
    StoreOp, StoreOpResult, StoreResult,
};
use mockall::mock;
use stat_schema::{formatters, MetricDefinition, MetricRegistry, SortOrder};

/// In-memory ordered-set store with the backing store's tie-break rules:
/// ascending score then ascending member, both reversed for descending
/// reads. `execute_batch` applies the whole batch under one lock, so a
/// batch is atomic relative to every other call.
#[derive(Default)]
pub struct MemoryStore {
    sets: Mutex<HashMap<String, HashMap<String, f64>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed<I, S>(&self, key: &str, entries: I)
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut sets = self.sets.lock().unwrap();
        let set = sets.entry(key.to_string()).or_default();
        for (member, score) in entries {
            set.insert(member.into(), score);
        }
    }

    pub fn score(&self, key: &str, member: &str) -> Option<f64> {
        let sets = self.sets.lock().unwrap();
        sets.get(key).and_then(|set| set.get(member)).copied()
    }

    pub fn contains(&self, key: &str, member: &str) -> bool {
        self.score(key, member).is_some()
    }

    pub fn len(&self, key: &str) -> usize {
        let sets = self.sets.lock().unwrap();
        sets.get(key).map(HashMap::len).unwrap_or(0)
    }

    fn sorted_in(
        sets: &HashMap<String, HashMap<String, f64>>,
        key: &str,
        order: SortOrder,
    ) -> Vec<ScoredMember> {
        let mut entries: Vec<ScoredMember> = sets
            .get(key)
            .map(|set| {
                set.iter()
                    .map(|(member, score)| ScoredMember {
                        member: member.clone(),
                        score: *score,
                    })
                    .collect()
            })
            .unwrap_or_default();
        entries.sort_by(|a, b| {
            let ascending = a
                .score
                .total_cmp(&b.score)
                .then_with(|| a.member.cmp(&b.member));
            match order {
                SortOrder::Ascending => ascending,
                SortOrder::Descending => ascending.reverse(),
            }
        });
        entries
    }

    fn rank_in(entries: &[ScoredMember], member: &str) -> Option<u64> {
        entries
            .iter()
            .position(|entry| entry.member == member)
            .map(|position| position as u64)
    }

    fn apply(sets: &mut HashMap<String, HashMap<String, f64>>, op: StoreOp) -> StoreOpResult {
        match op {
            StoreOp::Upsert { key, member, score } => {
                sets.entry(key).or_default().insert(member, score);
                StoreOpResult::Done
            }
            StoreOp::Remove { key, member } => {
                if let Some(set) = sets.get_mut(&key) {
                    set.remove(&member);
                }
                StoreOpResult::Done
            }
            StoreOp::RankOf { key, member, order } => {
                let entries = Self::sorted_in(sets, &key, order);
                StoreOpResult::Rank(Self::rank_in(&entries, &member))
            }
        }
    }
}

#[async_trait]
impl OrderedSetStore for MemoryStore {
    async fn upsert(&self, key: &str, member: &str, score: f64) -> StoreResult<()> {
        let mut sets = self.sets.lock().unwrap();
        sets.entry(key.to_string())
            .or_default()
            .insert(member.to_string(), score);
        Ok(())
    }

    async fn remove(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut sets = self.sets.lock().unwrap();
        if let Some(set) = sets.get_mut(key) {
            set.remove(member);
        }
        Ok(())
    }

    async fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: SortOrder,
    ) -> StoreResult<Vec<ScoredMember>> {
        let sets = self.sets.lock().unwrap();
        let entries = Self::sorted_in(&sets, key, order);
        let start = start as usize;
        if start >= entries.len() {
            return Ok(Vec::new());
        }
        let stop = (stop as usize + 1).min(entries.len());
        Ok(entries[start..stop].to_vec())
    }

    async fn rank_of(&self, key: &str, member: &str, order: SortOrder) -> StoreResult<Option<u64>> {
        let sets = self.sets.lock().unwrap();
        let entries = Self::sorted_in(&sets, key, order);
        Ok(Self::rank_in(&entries, member))
    }

    async fn execute_batch(&self, ops: Vec<StoreOp>) -> StoreResult<Vec<StoreOpResult>> {
        let mut sets = self.sets.lock().unwrap();
        Ok(ops
            .into_iter()
            .map(|op| Self::apply(&mut sets, op))
            .collect())
    }
}

/// Display resolver that names every entity after its id and carries no
/// fields. Enough for metrics without additional display fields.
pub struct EchoDisplay;

#[async_trait]
impl DisplayDataResolver for EchoDisplay {
    async fn fetch_display_data(
        &self,
        entity_ids: &[String],
        _field_keys: &[String],
    ) -> anyhow::Result<Vec<DisplayRecord>> {
        Ok(entity_ids
            .iter()
            .map(|id| DisplayRecord {
                name: id.clone(),
                fields: HashMap::new(),
            })
            .collect())
    }
}

mock! {
    pub DisplayData {}

    #[async_trait]
    impl DisplayDataResolver for DisplayData {
        async fn fetch_display_data(
            &self,
            entity_ids: &[String],
            field_keys: &[String],
        ) -> anyhow::Result<Vec<DisplayRecord>>;
    }
}

mock! {
    pub InputSearch {}

    #[async_trait]
    impl InputResolver for InputSearch {
        async fn resolve_rank(
            &self,
            entity_type: &str,
            field_key: &str,
            input: &str,
        ) -> anyhow::Result<Option<u64>>;
    }
}

/// Builds a display record from a name and field table.
pub fn record(name: &str, fields: &[(&str, FieldValue)]) -> DisplayRecord {
    DisplayRecord {
        name: name.to_string(),
        fields: fields
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect(),
    }
}

/// Registry used across the behavior tests: a game player with plain,
/// hidden, ascending, and display-joined metrics.
pub fn player_registry() -> MetricRegistry {
    MetricRegistry::builder()
        .metrics(
            "Player",
            [
                MetricDefinition::ranked("wins", SortOrder::Descending),
                MetricDefinition::ranked("losses", SortOrder::Descending).hidden(),
                MetricDefinition::ranked("fastest_win", SortOrder::Ascending),
                MetricDefinition::ranked("final_kills", SortOrder::Descending)
                    .with_formatter(formatters::commas)
                    .with_additional_fields(["final_deaths", "fkdr"])
                    .with_extra_display("level"),
                MetricDefinition::ranked("final_deaths", SortOrder::Descending),
                MetricDefinition::ranked("fkdr", SortOrder::Descending)
                    .with_formatter(formatters::ratio),
                MetricDefinition::display("level"),
            ],
        )
        .build()
        .unwrap()
}
