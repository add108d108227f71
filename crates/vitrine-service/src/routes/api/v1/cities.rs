use axum::{
    Router,
    extract::{Json, Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::AppState;
use crate::errors::ApiError;
use crate::models::{City, Neighborhood, NewCity, NewNeighborhood};
use crate::repositories::CityRepository;
use crate::validation::require_text;

async fn list_cities<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<Vec<City>>, ApiError> {
    let cities = state.city_repo().list_cities().await?;
    Ok(ResponseJson(cities))
}

#[derive(Debug, Deserialize)]
struct NameRequest {
    name: String,
}

#[instrument(skip_all, fields(name = %payload.name))]
async fn create_city<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<NameRequest>,
) -> Result<ResponseJson<City>, ApiError> {
    let name = require_text("name", &payload.name)?;
    let city = state.city_repo().create_city(&NewCity { name }).await?;
    info!(id = city.id, "Created city");
    Ok(ResponseJson(city))
}

#[instrument(skip_all, fields(id = %id))]
async fn rename_city<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<NameRequest>,
) -> Result<ResponseJson<City>, ApiError> {
    let name = require_text("name", &payload.name)?;
    let city = state.city_repo().rename_city(id, &name).await?;
    Ok(ResponseJson(city))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_city<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    state.city_repo().delete_city(id).await?;
    info!(id, "Deleted city and its neighborhoods");
    Ok(ResponseJson(serde_json::json!({ "deleted": id })))
}

async fn list_city_neighborhoods<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Vec<Neighborhood>>, ApiError> {
    let neighborhoods = state.city_repo().list_neighborhoods(Some(id)).await?;
    Ok(ResponseJson(neighborhoods))
}

#[instrument(skip_all, fields(city_id = %id, name = %payload.name))]
async fn create_neighborhood<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<NameRequest>,
) -> Result<ResponseJson<Neighborhood>, ApiError> {
    let name = require_text("name", &payload.name)?;
    let neighborhood = state
        .city_repo()
        .create_neighborhood(&NewNeighborhood { city_id: id, name })
        .await?;
    info!(id = neighborhood.id, "Created neighborhood");
    Ok(ResponseJson(neighborhood))
}

#[instrument(skip_all, fields(id = %id))]
async fn rename_neighborhood<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<NameRequest>,
) -> Result<ResponseJson<Neighborhood>, ApiError> {
    let name = require_text("name", &payload.name)?;
    let neighborhood = state.city_repo().rename_neighborhood(id, &name).await?;
    Ok(ResponseJson(neighborhood))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_neighborhood<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    state.city_repo().delete_neighborhood(id).await?;
    Ok(ResponseJson(serde_json::json!({ "deleted": id })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/cities", get(list_cities::<S>).post(create_city::<S>))
        .route(
            "/cities/{id}",
            axum::routing::put(rename_city::<S>).delete(delete_city::<S>),
        )
        .route(
            "/cities/{id}/neighborhoods",
            get(list_city_neighborhoods::<S>).post(create_neighborhood::<S>),
        )
        .route(
            "/neighborhoods/{id}",
            axum::routing::put(rename_neighborhood::<S>).delete(delete_neighborhood::<S>),
        )
}
