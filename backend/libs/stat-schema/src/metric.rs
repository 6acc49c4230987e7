//! Metric definitions.
//!
//! A [`MetricDefinition`] describes one field of a tracked entity type: its
//! display names, sort direction, optional score formatter, and the auxiliary
//! fields a leaderboard page shows next to it.

/// Sort direction of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Lowest score first (fastest times, death counts).
    Ascending,
    /// Highest score first, the common case.
    Descending,
}

/// Renders a raw score into its display form.
pub type Formatter = fn(f64) -> String;

/// Static description of one entity field, looked up by (entity type, field key).
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    /// Field key as it appears in stat snapshots and ranking keys.
    pub field_key: String,
    /// Metric title, used as the leaderboard page name (e.g. "Bed Wars Wins").
    pub name: String,
    /// Column header (e.g. "Wins").
    pub short_name: String,
    pub sort: SortOrder,
    /// Applied to numeric values before display.
    pub formatter: Option<Formatter>,
    /// Ranked but omitted from the page columns, e.g. raw experience when a
    /// level column is shown instead.
    pub hidden: bool,
    /// Whether the field keeps a ranking of its own. Display-only definitions
    /// exist so ranked metrics can reference them.
    pub rankable: bool,
    /// Field keys joined in as extra columns, in display order.
    pub additional_fields: Vec<String>,
    /// Field whose value prefixes the display name (e.g. a level tag).
    pub extra_display: Option<String>,
}

impl MetricDefinition {
    /// Ranked metric with prettified default names.
    pub fn ranked(field_key: impl Into<String>, sort: SortOrder) -> Self {
        let field_key = field_key.into();
        let name = prettify(&field_key);
        MetricDefinition {
            short_name: name.clone(),
            name,
            field_key,
            sort,
            formatter: None,
            hidden: false,
            rankable: true,
            additional_fields: Vec::new(),
            extra_display: None,
        }
    }

    /// Display-only definition: never ranked, but referenceable from
    /// `additional_fields` and `extra_display` of ranked metrics.
    pub fn display(field_key: impl Into<String>) -> Self {
        MetricDefinition {
            rankable: false,
            ..MetricDefinition::ranked(field_key, SortOrder::Descending)
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Keep the ranking but drop the metric's own column from pages.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn with_additional_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.additional_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_extra_display(mut self, field_key: impl Into<String>) -> Self {
        self.extra_display = Some(field_key.into());
        self
    }
}

/// Human readable label for a raw field key: the last dot segment is split on
/// underscores and lowercase-to-uppercase boundaries, each word capitalized.
/// Both `"bedwars.final_kills"` and `"finalKills"` become `"Final Kills"`.
pub fn prettify(field_key: &str) -> String {
    let segment = field_key.rsplit('.').next().unwrap_or(field_key);

    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for ch in segment.chars() {
        if ch == '_' || ch == '-' || ch == ' ' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        } else {
            if ch.is_uppercase() && prev_lower {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = ch.is_lowercase();
            current.push(ch);
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut label = String::with_capacity(segment.len() + words.len());
    for (i, word) in words.iter().enumerate() {
        if i > 0 {
            label.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            label.extend(first.to_uppercase());
            label.push_str(chars.as_str());
        }
    }
    label
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prettify_splits_underscores_and_camel_case() {
        assert_eq!(prettify("wins"), "Wins");
        assert_eq!(prettify("final_kills"), "Final Kills");
        assert_eq!(prettify("finalKills"), "Final Kills");
        assert_eq!(prettify("bedwars.solo_insane_wins"), "Solo Insane Wins");
    }

    #[test]
    fn test_ranked_defaults_to_prettified_names() {
        let def = MetricDefinition::ranked("final_kills", SortOrder::Descending);

        assert_eq!(def.name, "Final Kills");
        assert_eq!(def.short_name, "Final Kills");
        assert!(def.rankable);
        assert!(!def.hidden);
        assert!(def.additional_fields.is_empty());
    }

    #[test]
    fn test_builder_methods_override_defaults() {
        let def = MetricDefinition::ranked("wins", SortOrder::Descending)
            .with_name("Bed Wars Wins")
            .with_short_name("Wins")
            .with_additional_fields(["losses", "wlr"])
            .with_extra_display("rank_tag")
            .hidden();

        assert_eq!(def.name, "Bed Wars Wins");
        assert_eq!(def.short_name, "Wins");
        assert_eq!(def.additional_fields, vec!["losses", "wlr"]);
        assert_eq!(def.extra_display.as_deref(), Some("rank_tag"));
        assert!(def.hidden);
    }

    #[test]
    fn test_display_definitions_are_not_rankable() {
        let def = MetricDefinition::display("rank_tag");

        assert!(!def.rankable);
        assert_eq!(def.name, "Rank Tag");
    }
}
