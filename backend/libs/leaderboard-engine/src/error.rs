//! Engine error taxonomy.

use std::time::Duration;

use thiserror::Error;

/// Failures of the ranking store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected store reply: {0}")]
    InvalidReply(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the ranking reader and writer.
///
/// `UnknownMetric` and `InputNotFound` are caller-input errors; the rest are
/// server-side, and any retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum LeaderboardError {
    #[error("no ranked metric \"{field_key}\" for entity type \"{entity_type}\"")]
    UnknownMetric {
        entity_type: String,
        field_key: String,
    },

    #[error("ranking store failure: {0}")]
    Store(#[from] StoreError),

    /// The display resolver broke its one-record-per-id contract.
    #[error("display data mismatch: {0}")]
    ResolverMismatch(String),

    #[error("no ranked entity matches \"{0}\"")]
    InputNotFound(String),

    /// A collaborating resolver failed outright.
    #[error("resolver failure: {0}")]
    Resolver(#[from] anyhow::Error),
}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;
