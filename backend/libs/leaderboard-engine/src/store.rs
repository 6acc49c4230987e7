//! Ordered-set store client.
//!
//! The engine talks to its backing store through [`OrderedSetStore`]; the
//! production implementation is [`RedisStore`] over sorted sets. Writes and
//! rank lookups go through [`OrderedSetStore::execute_batch`], which must
//! apply its operations atomically: readers see all of a batch or none of it.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use stat_schema::SortOrder;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// One member of a ranking with its score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

/// One operation of an atomic batch.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Upsert {
        key: String,
        member: String,
        score: f64,
    },
    Remove {
        key: String,
        member: String,
    },
    RankOf {
        key: String,
        member: String,
        order: SortOrder,
    },
}

/// Result slot for the operation at the same batch index.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOpResult {
    /// Upserts and removes acknowledge without a payload.
    Done,
    /// 0-based rank; `None` when the member is absent from the ranking.
    Rank(Option<u64>),
}

/// Transactional client over a remote ordered-set service.
#[async_trait]
pub trait OrderedSetStore: Send + Sync {
    /// Inserts the member or overwrites its score.
    async fn upsert(&self, key: &str, member: &str, score: f64) -> StoreResult<()>;

    /// Deletes the member's entry; no-op when absent.
    async fn remove(&self, key: &str, member: &str) -> StoreResult<()>;

    /// Members ranked `start..=stop` (0-based) in `order`, with scores.
    async fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: SortOrder,
    ) -> StoreResult<Vec<ScoredMember>>;

    /// The member's 0-based rank in `order`, or `None` when unranked.
    async fn rank_of(&self, key: &str, member: &str, order: SortOrder)
        -> StoreResult<Option<u64>>;

    /// Runs `ops` as one atomic unit; results align with `ops` by index.
    async fn execute_batch(&self, ops: Vec<StoreOp>) -> StoreResult<Vec<StoreOpResult>>;
}

/// [`OrderedSetStore`] over Redis sorted sets.
///
/// Rankings map onto ZADD / ZREM / ZRANGE / ZRANK and their descending
/// variants; batches run as MULTI/EXEC pipelines. The connection manager
/// multiplexes one connection and reconnects on failure.
#[derive(Clone)]
pub struct RedisStore {
    redis: ConnectionManager,
    operation_timeout: Duration,
}

impl RedisStore {
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let redis = ConnectionManager::new(client).await?;
        info!("connected to ranking store");
        Ok(RedisStore {
            redis,
            operation_timeout: config.operation_timeout(),
        })
    }

    /// Applies the per-command deadline to one store round trip.
    async fn run<F, T>(&self, op: &'static str, key: &str, future: F) -> StoreResult<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        debug!(op, key, "ranking store call");
        match timeout(self.operation_timeout, future).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                warn!(op, key, error = ?err, "ranking store call failed");
                Err(StoreError::Redis(err))
            }
            Err(_) => {
                warn!(
                    op,
                    key,
                    timeout_ms = self.operation_timeout.as_millis() as u64,
                    "ranking store call timed out"
                );
                Err(StoreError::Timeout(self.operation_timeout))
            }
        }
    }
}

#[async_trait]
impl OrderedSetStore for RedisStore {
    async fn upsert(&self, key: &str, member: &str, score: f64) -> StoreResult<()> {
        let mut redis = self.redis.clone();
        self.run("zadd", key, async move {
            redis.zadd(key, member, score).await
        })
        .await
    }

    async fn remove(&self, key: &str, member: &str) -> StoreResult<()> {
        let mut redis = self.redis.clone();
        self.run("zrem", key, async move { redis.zrem(key, member).await })
            .await
    }

    async fn range_by_rank(
        &self,
        key: &str,
        start: u64,
        stop: u64,
        order: SortOrder,
    ) -> StoreResult<Vec<ScoredMember>> {
        let mut redis = self.redis.clone();
        let entries: Vec<(String, f64)> = self
            .run("zrange", key, async move {
                match order {
                    SortOrder::Ascending => {
                        redis
                            .zrange_withscores(key, start as isize, stop as isize)
                            .await
                    }
                    SortOrder::Descending => {
                        redis
                            .zrevrange_withscores(key, start as isize, stop as isize)
                            .await
                    }
                }
            })
            .await?;

        Ok(entries
            .into_iter()
            .map(|(member, score)| ScoredMember { member, score })
            .collect())
    }

    async fn rank_of(
        &self,
        key: &str,
        member: &str,
        order: SortOrder,
    ) -> StoreResult<Option<u64>> {
        let mut redis = self.redis.clone();
        self.run("zrank", key, async move {
            match order {
                SortOrder::Ascending => redis.zrank(key, member).await,
                SortOrder::Descending => redis.zrevrank(key, member).await,
            }
        })
        .await
    }

    async fn execute_batch(&self, ops: Vec<StoreOp>) -> StoreResult<Vec<StoreOpResult>> {
        if ops.is_empty() {
            return Ok(Vec::new());
        }

        let mut pipe = redis::pipe();
        pipe.atomic();
        for op in &ops {
            match op {
                StoreOp::Upsert { key, member, score } => {
                    pipe.zadd(key, member, *score);
                }
                StoreOp::Remove { key, member } => {
                    pipe.zrem(key, member);
                }
                StoreOp::RankOf { key, member, order } => {
                    match order {
                        SortOrder::Ascending => pipe.zrank(key, member),
                        SortOrder::Descending => pipe.zrevrank(key, member),
                    };
                }
            }
        }

        let mut redis = self.redis.clone();
        let replies: Vec<redis::Value> = self
            .run("exec", "pipeline", async move {
                pipe.query_async(&mut redis).await
            })
            .await?;

        if replies.len() != ops.len() {
            return Err(StoreError::InvalidReply(format!(
                "batch of {} operations got {} replies",
                ops.len(),
                replies.len()
            )));
        }

        ops.iter()
            .zip(replies)
            .map(|(op, reply)| match op {
                StoreOp::RankOf { .. } => {
                    let rank: Option<u64> = redis::from_redis_value(&reply)?;
                    Ok(StoreOpResult::Rank(rank))
                }
                _ => Ok(StoreOpResult::Done),
            })
            .collect()
    }
}
