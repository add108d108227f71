//! Filter predicate evaluation.
//!
//! Criteria groups combine conjunctively; selections within a group
//! combine disjunctively. An empty group places no constraint at all,
//! and an item missing a field fails only the predicate that references
//! that field.

use chrono::{Datelike, NaiveDateTime};

use super::Listable;

/// The viewer's current filter selection.
///
/// Category, source, city and neighborhood matching is exact-string and
/// case-sensitive, as the original application behaved; search is the
/// only case-insensitive axis. Neighborhood selections presume a chosen
/// city (the UI disables the picker until one is picked) — the
/// evaluator itself does not enforce that.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub categories: Vec<String>,
    pub sources: Vec<String>,
    pub cities: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub search: String,
    pub start_date: Option<NaiveDateTime>,
}

impl FilterCriteria {
    pub fn is_unconstrained(&self) -> bool {
        self.categories.is_empty()
            && self.sources.is_empty()
            && self.cities.is_empty()
            && self.neighborhoods.is_empty()
            && self.search.trim().is_empty()
            && self.start_date.is_none()
    }

    /// Decides whether one item is included under this selection.
    pub fn matches(&self, item: &impl Listable) -> bool {
        group_matches(&self.categories, item.category())
            && group_matches(&self.sources, item.source())
            && group_matches(&self.cities, item.city())
            && group_matches(&self.neighborhoods, item.neighborhood())
            && self.search_matches(item)
            && self.date_matches(item)
    }

    fn search_matches(&self, item: &impl Listable) -> bool {
        let needle = self.search.trim();
        if needle.is_empty() {
            return true;
        }

        let needle = needle.to_lowercase();
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    fn date_matches(&self, item: &impl Listable) -> bool {
        match self.start_date {
            None => true,
            // Inclusive instant comparison: an event starting late on
            // the cutoff day still passes a midnight cutoff.
            Some(cutoff) => item.start_instant().is_some_and(|start| start >= cutoff),
        }
    }
}

fn group_matches(selected: &[String], value: Option<&str>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match value {
        Some(value) => selected.iter().any(|s| s == value),
        None => false,
    }
}

const MONTHS_PT_BR: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Renders a date the way event cards display it ("02 de maio de 2025"),
/// so the free-text search can match what the viewer sees on screen.
pub fn format_date_pt_br(date: NaiveDateTime) -> String {
    let month = MONTHS_PT_BR[date.month0() as usize];
    format!("{:02} de {} de {}", date.day(), month, date.year())
}
