//! Ranking key derivation.
//!
//! One ranking key names one ordered set in the store. The scheme is part of
//! the wire contract: independently built writers and readers must agree on
//! it byte for byte.

/// Key of the ranking for `field_key` under `entity_type`.
///
/// Only the entity type is lowercased; field keys pass through untouched.
pub fn ranking_key(entity_type: &str, field_key: &str) -> String {
    format!("{}.{}", entity_type.to_lowercase(), field_key)
}
