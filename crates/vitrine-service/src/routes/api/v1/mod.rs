use axum::Router;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::AppState;
use crate::errors::ApiError;
use crate::listing::window::DEFAULT_PAGE_SIZE;

mod cities;
mod events;
mod places;
mod saved;
mod services;
mod users;

/// Shared shape of every list endpoint: the requested page plus the
/// total match count for the "N results found" readout.
#[derive(Debug, Serialize)]
struct ListResponse<T> {
    items: Vec<T>,
    total: usize,
    limit: usize,
    offset: usize,
}

impl<T> ListResponse<T> {
    /// Slices one page out of a filtered, sorted collection.
    fn paginate(
        items: Vec<T>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Self, ApiError> {
        if limit == Some(0) {
            return Err(ApiError::BadRequest(
                "Limit must be greater than 0".to_string(),
            ));
        }

        let limit = limit.map_or(DEFAULT_PAGE_SIZE, |l| l as usize);
        let offset = offset.unwrap_or(0) as usize;
        let total = items.len();

        let page: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

        Ok(Self {
            items: page,
            total,
            limit,
            offset,
        })
    }
}

/// Comma-separated multi-select query parameter, e.g.
/// `categories=Museu,Praia`. Blank entries are dropped.
fn split_csv(raw: Option<String>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Date cutoffs arrive either as a full RFC 3339 instant or as a plain
/// date, which is read as local midnight.
fn parse_start_date(raw: &str) -> Result<NaiveDateTime, ApiError> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.naive_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap());
    }
    Err(ApiError::BadRequest(
        "Invalid 'start_date'. Use RFC3339 or YYYY-MM-DD.".to_string(),
    ))
}

/// Today's midnight, the reference instant for the event visibility
/// gate (the original compared against the start of the current day).
fn start_of_today() -> NaiveDateTime {
    Utc::now().date_naive().and_hms_opt(0, 0, 0).unwrap()
}

pub fn create_api_v1_router<S: AppState>() -> Router<S> {
    Router::new()
        .merge(events::router())
        .merge(places::router())
        .merge(services::router())
        .merge(cities::router())
        .merge(users::router())
        .merge(saved::router())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_handles_blank_and_spaced_entries() {
        assert_eq!(
            split_csv(Some("Museu, Praia,,".into())),
            vec!["Museu".to_string(), "Praia".to_string()]
        );
        assert!(split_csv(None).is_empty());
        assert!(split_csv(Some("".into())).is_empty());
    }

    #[test]
    fn parse_start_date_accepts_both_forms() {
        assert_eq!(
            parse_start_date("2024-05-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
        assert_eq!(
            parse_start_date("2024-05-01T12:30:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap()
        );
        assert!(parse_start_date("May 1st").is_err());
    }

    #[test]
    fn paginate_slices_and_reports_the_full_total() {
        let page = ListResponse::paginate((0..55).collect(), Some(20), Some(40)).unwrap();
        assert_eq!(page.items, (40..55).collect::<Vec<_>>());
        assert_eq!(page.total, 55);
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 40);
    }

    #[test]
    fn paginate_rejects_zero_limit() {
        assert!(ListResponse::paginate(vec![1, 2], Some(0), None).is_err());
    }

    #[test]
    fn paginate_past_the_end_is_empty_not_an_error() {
        let page = ListResponse::paginate(vec![1, 2, 3], Some(10), Some(50)).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
