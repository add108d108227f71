//! Display-order comparators for the listing kinds.

use std::cmp::Ordering;

use crate::models::{Event, Place, Service};

/// Event listing order: sponsored ("highlighted") events first, then
/// chronologically. Must be used with a stable sort so same-day
/// sponsored events do not flicker across refreshes.
pub fn highlighted_then_soonest(a: &Event, b: &Event) -> Ordering {
    b.highlighted
        .cmp(&a.highlighted)
        .then_with(|| a.date.cmp(&b.date))
}

/// Place listing order: most recently added first.
pub fn newest_place_first(a: &Place, b: &Place) -> Ordering {
    b.date_created.cmp(&a.date_created)
}

/// Service listing order: most recently registered first.
pub fn newest_service_first(a: &Service, b: &Service) -> Ordering {
    b.created_at.cmp(&a.created_at)
}
