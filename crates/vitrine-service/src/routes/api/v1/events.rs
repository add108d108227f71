use axum::{
    Router,
    extract::{Json, Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{ListResponse, parse_start_date, split_csv, start_of_today};
use crate::errors::ApiError;
use crate::listing::{FilterCriteria, ListingPipeline, order};
use crate::models::{Event, EventChanges, NewEvent};
use crate::AppState;
use crate::repositories::EventRepository;

#[derive(Debug, Deserialize)]
struct ListEventsQuery {
    categories: Option<String>,
    sources: Option<String>,
    q: Option<String>,
    start_date: Option<String>,
    /// Admin/creator surface: skip the upcoming-or-ongoing gate.
    include_past: Option<bool>,
    limit: Option<u32>,
    offset: Option<u32>,
}

#[instrument(skip_all, fields(
    has_categories = query.categories.is_some(),
    has_search = query.q.is_some(),
    include_past = query.include_past.unwrap_or(false),
))]
async fn list_events<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ListEventsQuery>,
) -> Result<ResponseJson<ListResponse<Event>>, ApiError> {
    debug!("Processing event list request");

    let criteria = FilterCriteria {
        categories: split_csv(query.categories),
        sources: split_csv(query.sources),
        search: query.q.unwrap_or_default(),
        start_date: query
            .start_date
            .as_deref()
            .map(parse_start_date)
            .transpose()?,
        ..Default::default()
    };

    let repo = state.event_repo();
    let fetched = if query.include_past.unwrap_or(false) {
        repo.list_all().await?
    } else {
        repo.list_current(start_of_today()).await?
    };

    let pipeline = ListingPipeline::new(order::highlighted_then_soonest);
    let filtered = pipeline.run(fetched, &criteria);

    let response = ListResponse::paginate(filtered, query.limit, query.offset)?;
    info!(
        returned_count = response.items.len(),
        total = response.total,
        "Successfully retrieved event list"
    );
    Ok(ResponseJson(response))
}

#[instrument(skip_all, fields(title = %payload.title, category = %payload.category))]
async fn create_event<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<NewEvent>,
) -> Result<ResponseJson<Event>, ApiError> {
    let new_event = payload.validated()?;
    let event = state.event_repo().create(&new_event).await?;
    info!(id = event.id, "Created event");
    Ok(ResponseJson(event))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_event<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Event>, ApiError> {
    let event = state.event_repo().find_by_id(id).await?;
    event.map(ResponseJson).ok_or(ApiError::NotFound)
}

#[instrument(skip_all, fields(id = %id))]
async fn update_event<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(changes): Json<EventChanges>,
) -> Result<ResponseJson<Event>, ApiError> {
    let event = state.event_repo().update(id, &changes).await?;
    info!(id = event.id, "Updated event");
    Ok(ResponseJson(event))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_event<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    state.event_repo().delete(id).await?;
    info!(id, "Deleted event");
    Ok(ResponseJson(serde_json::json!({ "deleted": id })))
}

/// Flips the sponsored flag, moving the event between the two sort
/// partitions of the listing.
#[instrument(skip_all, fields(id = %id))]
async fn toggle_highlight<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Event>, ApiError> {
    let repo = state.event_repo();
    let event = repo.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    let updated = repo.set_highlighted(id, !event.highlighted).await?;
    info!(id, highlighted = updated.highlighted, "Toggled highlight");
    Ok(ResponseJson(updated))
}

#[derive(Debug, Deserialize)]
struct LikeRequest {
    user_id: i32,
}

#[instrument(skip_all, fields(id = %id, user_id = payload.user_id))]
async fn toggle_like<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<LikeRequest>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    let repo = state.event_repo();
    repo.find_by_id(id).await?.ok_or(ApiError::NotFound)?;
    let liked = repo.toggle_like(payload.user_id, id).await?;
    Ok(ResponseJson(serde_json::json!({ "liked": liked })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/events", get(list_events::<S>).post(create_event::<S>))
        .route(
            "/events/{id}",
            get(get_event::<S>)
                .put(update_event::<S>)
                .delete(delete_event::<S>),
        )
        .route("/events/{id}/highlight", post(toggle_highlight::<S>))
        .route("/events/{id}/like", post(toggle_like::<S>))
}
