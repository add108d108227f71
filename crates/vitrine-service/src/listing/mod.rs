//! The filter → sort → paginate pipeline shared by the events, places
//! and services listings.
//!
//! The original per-entity listing views ran three near-identical
//! copies of the same logic; here it is a single [`ListingPipeline`]
//! parameterized by a visibility predicate, the [`FilterCriteria`]
//! evaluator and a comparator. Pagination is the incremental
//! [`window::PageWindow`] consumed through a [`session::ListingController`].

use std::cmp::Ordering;
use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::debug;

use crate::models::{Event, Place, Service};

pub mod criteria;
pub mod order;
pub mod session;
pub mod window;

pub use criteria::FilterCriteria;

/// Field projections the pipeline needs from a listed record.
///
/// Every axis is optional: an item that does not carry a field simply
/// fails any predicate referencing it, while still participating in the
/// others.
pub trait Listable {
    fn category(&self) -> Option<&str> {
        None
    }
    fn source(&self) -> Option<&str> {
        None
    }
    fn city(&self) -> Option<&str> {
        None
    }
    fn neighborhood(&self) -> Option<&str> {
        None
    }
    /// Haystacks for the free-text search, matched case-insensitively.
    fn search_fields(&self) -> Vec<String>;
    /// Start instant, for the date-cutoff predicate. Dateless kinds
    /// return `None` and are unaffected by cutoffs.
    fn start_instant(&self) -> Option<NaiveDateTime> {
        None
    }
    fn highlighted(&self) -> bool {
        false
    }
}

impl Listable for Event {
    fn category(&self) -> Option<&str> {
        Some(&self.category)
    }

    fn source(&self) -> Option<&str> {
        Some(&self.source)
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.title.clone(), criteria::format_date_pt_br(self.date)];
        if let Some(location) = &self.location {
            fields.push(location.clone());
        }
        fields
    }

    fn start_instant(&self) -> Option<NaiveDateTime> {
        Some(self.date)
    }

    fn highlighted(&self) -> bool {
        self.highlighted
    }
}

impl Listable for Place {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn city(&self) -> Option<&str> {
        Some(&self.city)
    }

    fn neighborhood(&self) -> Option<&str> {
        self.neighborhood.as_deref()
    }

    fn search_fields(&self) -> Vec<String> {
        let mut fields = vec![self.place_name.clone(), self.city.clone()];
        if let Some(address) = &self.address {
            fields.push(address.clone());
        }
        if let Some(neighborhood) = &self.neighborhood {
            fields.push(neighborhood.clone());
        }
        fields
    }
}

impl Listable for Service {
    fn category(&self) -> Option<&str> {
        Some(&self.main_service)
    }

    fn city(&self) -> Option<&str> {
        Some(&self.city)
    }

    fn neighborhood(&self) -> Option<&str> {
        Some(&self.neighborhood)
    }

    fn search_fields(&self) -> Vec<String> {
        vec![
            self.title.clone(),
            self.city.clone(),
            self.neighborhood.clone(),
        ]
    }
}

type Visibility<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type Comparator<T> = Arc<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// One configured instance of the filter-sort pipeline.
///
/// The visibility gate is normally applied server-side by the
/// repository query; attach one here only when the fetcher hands back
/// an ungated collection. The gate is a pure filter, so re-running it
/// over already-gated input is harmless.
pub struct ListingPipeline<T> {
    visibility: Option<Visibility<T>>,
    compare: Comparator<T>,
}

impl<T> Clone for ListingPipeline<T> {
    fn clone(&self) -> Self {
        Self {
            visibility: self.visibility.clone(),
            compare: self.compare.clone(),
        }
    }
}

impl<T: Listable> ListingPipeline<T> {
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + Send + Sync + 'static) -> Self {
        Self {
            visibility: None,
            compare: Arc::new(compare),
        }
    }

    pub fn with_visibility(
        mut self,
        gate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.visibility = Some(Arc::new(gate));
        self
    }

    /// Gate, filter and stably sort a freshly fetched collection.
    pub fn run(&self, items: Vec<T>, criteria: &FilterCriteria) -> Vec<T> {
        let fetched = items.len();

        let mut kept: Vec<T> = items
            .into_iter()
            .filter(|item| {
                self.visibility.as_ref().is_none_or(|gate| gate(item)) && criteria.matches(item)
            })
            .collect();

        // Vec::sort_by is stable; equal (highlighted, date) pairs keep
        // their fetch order across refreshes.
        kept.sort_by(|a, b| (self.compare)(a, b));

        debug!(fetched, kept = kept.len(), "listing pipeline run");
        kept
    }
}

/// Visibility gate for the public event listing: upcoming events, plus
/// events whose ongoing window has not closed yet.
pub fn event_is_current(event: &Event, today: NaiveDateTime) -> bool {
    event.date >= today || event.end_date.is_some_and(|end| end >= today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn event(id: i32, date: NaiveDateTime, end_date: Option<NaiveDateTime>) -> Event {
        Event {
            id,
            title: format!("event {id}"),
            link: "https://example.com".into(),
            date,
            end_date,
            uf: "ES".into(),
            category: "Feira/Exposição".into(),
            source: "Agenda".into(),
            image: None,
            location: None,
            description: None,
            highlighted: false,
            created_at: day(1),
        }
    }

    #[test]
    fn gate_keeps_upcoming_and_ongoing_events() {
        let today = day(10);
        assert!(event_is_current(&event(1, day(11), None), today));
        assert!(event_is_current(&event(2, day(10), None), today));
        assert!(event_is_current(&event(3, day(5), Some(day(12))), today));
        assert!(!event_is_current(&event(4, day(5), Some(day(9))), today));
        assert!(!event_is_current(&event(5, day(5), None), today));
    }

    #[test]
    fn gate_is_idempotent() {
        let today = day(10);
        let items = vec![
            event(1, day(11), None),
            event(2, day(5), None),
            event(3, day(4), Some(day(20))),
        ];

        let once: Vec<Event> = items
            .into_iter()
            .filter(|e| event_is_current(e, today))
            .collect();
        let twice: Vec<Event> = once
            .clone()
            .into_iter()
            .filter(|e| event_is_current(e, today))
            .collect();

        let once_ids: Vec<i32> = once.iter().map(|e| e.id).collect();
        let twice_ids: Vec<i32> = twice.iter().map(|e| e.id).collect();
        assert_eq!(once_ids, twice_ids);
        assert_eq!(once_ids, vec![1, 3]);
    }

    #[test]
    fn pipeline_applies_gate_before_criteria() {
        let today = day(10);
        let pipeline = ListingPipeline::new(order::highlighted_then_soonest)
            .with_visibility(move |e: &Event| event_is_current(e, today));

        let items = vec![event(1, day(12), None), event(2, day(3), None)];
        let kept = pipeline.run(items, &FilterCriteria::default());

        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, 1);
    }
}
