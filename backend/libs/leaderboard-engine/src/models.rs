//! Payload models shared by the ranking services.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One stat value as carried in entity snapshots and display records.
///
/// Only numbers rank; text turns up in display columns (formatted levels,
/// prefixes) and is skipped by the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Number(value) => write!(f, "{}", value),
            FieldValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Display data for one entity, as returned by the display resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayRecord {
    pub name: String,
    /// Must contain every field key the reader requested.
    #[serde(default)]
    pub fields: HashMap<String, FieldValue>,
}

/// How a leaderboard query addresses the ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LeaderboardQuery {
    /// 0-based page index.
    Page(u64),
    /// Free text resolved to the entity it names; the page containing that
    /// entity comes back with its row highlighted.
    Input(String),
    /// 1-based rank; the page containing it comes back with that rank's row
    /// highlighted.
    Position(u64),
}

/// One resolved leaderboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardPage {
    /// Metric title, e.g. "Bed Wars Wins".
    pub name: String,
    /// Column headers, aligned with each row's `fields`.
    pub columns: Vec<String>,
    pub rows: Vec<LeaderboardRow>,
    /// 0-based index of the page the window snapped to.
    pub page: u64,
}

/// One row of a leaderboard page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub entity_id: String,
    /// Display name, prefixed with the extra-display value when configured.
    pub name: String,
    /// Column values, aligned with the page's `columns`.
    pub fields: Vec<FieldValue>,
    /// 1-based rank.
    pub position: u64,
    /// Set on the row a Position or Input query targeted.
    pub highlighted: bool,
}

/// Rank of one entity on one field, from a rank lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRank {
    pub field_key: String,
    /// 1-based rank; 0 means unranked.
    pub rank: u64,
}
