use axum::{
    Router,
    extract::{Json, Path, Query, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use tracing::{debug, info, instrument};

use super::{ListResponse, split_csv};
use crate::AppState;
use crate::errors::ApiError;
use crate::listing::{FilterCriteria, ListingPipeline, order};
use crate::models::{NewPlace, Place, PlaceChanges};
use crate::repositories::PlaceRepository;

#[derive(Debug, Deserialize)]
struct ListPlacesQuery {
    categories: Option<String>,
    cities: Option<String>,
    neighborhoods: Option<String>,
    q: Option<String>,
    /// Admin surface: include drafts awaiting publication.
    include_unpublished: Option<bool>,
    limit: Option<u32>,
    offset: Option<u32>,
}

#[instrument(skip_all, fields(
    has_categories = query.categories.is_some(),
    has_cities = query.cities.is_some(),
    has_search = query.q.is_some(),
))]
async fn list_places<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ListPlacesQuery>,
) -> Result<ResponseJson<ListResponse<Place>>, ApiError> {
    debug!("Processing place list request");

    let criteria = FilterCriteria {
        categories: split_csv(query.categories),
        cities: split_csv(query.cities),
        neighborhoods: split_csv(query.neighborhoods),
        search: query.q.unwrap_or_default(),
        ..Default::default()
    };

    let repo = state.place_repo();
    let fetched = if query.include_unpublished.unwrap_or(false) {
        repo.list_all().await?
    } else {
        repo.list_published().await?
    };

    let pipeline = ListingPipeline::new(order::newest_place_first);
    let filtered = pipeline.run(fetched, &criteria);

    let response = ListResponse::paginate(filtered, query.limit, query.offset)?;
    info!(
        returned_count = response.items.len(),
        total = response.total,
        "Successfully retrieved place list"
    );
    Ok(ResponseJson(response))
}

#[instrument(skip_all, fields(place_name = %payload.place_name, city = %payload.city))]
async fn create_place<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<NewPlace>,
) -> Result<ResponseJson<Place>, ApiError> {
    let new_place = payload.validated()?;
    let place = state.place_repo().create(&new_place).await?;
    info!(id = place.id, "Created place");
    Ok(ResponseJson(place))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_place<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Place>, ApiError> {
    let place = state.place_repo().find_by_id(id).await?;
    place.map(ResponseJson).ok_or(ApiError::NotFound)
}

#[instrument(skip_all, fields(id = %id))]
async fn update_place<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(changes): Json<PlaceChanges>,
) -> Result<ResponseJson<Place>, ApiError> {
    let place = state.place_repo().update(id, &changes).await?;
    info!(id = place.id, "Updated place");
    Ok(ResponseJson(place))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_place<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    state.place_repo().delete(id).await?;
    info!(id, "Deleted place");
    Ok(ResponseJson(serde_json::json!({ "deleted": id })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/places", get(list_places::<S>).post(create_place::<S>))
        .route(
            "/places/{id}",
            get(get_place::<S>)
                .put(update_place::<S>)
                .delete(delete_place::<S>),
        )
}
