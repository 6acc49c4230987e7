//! Metric metadata for Tally leaderboards
//!
//! Every tracked entity type (players, guilds) declares which of its numeric
//! fields keep a global ranking, how those rankings sort and format, and which
//! auxiliary fields a leaderboard page joins in next to them. Definitions are
//! registered once at startup, validated as a whole, and read-only afterwards.

// Score display helpers
pub mod formatters;
// Per-field definitions
pub mod metric;
// Process-wide lookup, built once at startup
pub mod registry;

// Re-export commonly used types
pub use metric::{prettify, Formatter, MetricDefinition, SortOrder};
pub use registry::{MetricRegistry, MetricRegistryBuilder, SchemaError};
