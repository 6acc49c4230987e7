//! Leaderboard engine for Tally
//!
//! Keeps one global ranking per (entity type, rankable field) in a remote
//! ordered-set store and answers three query shapes against it: page windows,
//! rank-of-entity, and rank-around-position. Stat updates land as atomic
//! batches so readers never see a half-applied snapshot. Display names and
//! free-text search live behind resolver traits; the store is Redis sorted
//! sets in production and swappable in tests.

pub mod config;
pub mod error;
pub mod keys;
pub mod models;
pub mod resolvers;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use config::StoreConfig;
pub use error::{LeaderboardError, LeaderboardResult, StoreError, StoreResult};
pub use models::{
    DisplayRecord, FieldRank, FieldValue, LeaderboardPage, LeaderboardQuery, LeaderboardRow,
};
pub use resolvers::{DisplayDataResolver, InputResolver};
pub use services::{RankingReader, RankingWriter, FORMAT_RESET, PAGE_SIZE};
pub use store::{OrderedSetStore, RedisStore, ScoredMember, StoreOp, StoreOpResult};
