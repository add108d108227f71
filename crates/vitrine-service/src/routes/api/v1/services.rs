use axum::{
    Router,
    extract::{Json, Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{ListResponse, split_csv};
use crate::AppState;
use crate::errors::ApiError;
use crate::listing::{FilterCriteria, ListingPipeline, order};
use crate::models::{NewService, Service, ServiceChanges};
use crate::repositories::{ServiceRepository, UserRepository};

#[derive(Debug, Deserialize)]
struct ListServicesQuery {
    /// Filters on the provider's main service, the category axis of
    /// this listing.
    categories: Option<String>,
    cities: Option<String>,
    neighborhoods: Option<String>,
    q: Option<String>,
    limit: Option<u32>,
    offset: Option<u32>,
}

#[instrument(skip_all, fields(
    has_categories = query.categories.is_some(),
    has_cities = query.cities.is_some(),
    has_search = query.q.is_some(),
))]
async fn list_services<S: AppState>(
    State(state): State<S>,
    Query(query): Query<ListServicesQuery>,
) -> Result<ResponseJson<ListResponse<Service>>, ApiError> {
    debug!("Processing service list request");

    let criteria = FilterCriteria {
        categories: split_csv(query.categories),
        cities: split_csv(query.cities),
        neighborhoods: split_csv(query.neighborhoods),
        search: query.q.unwrap_or_default(),
        ..Default::default()
    };

    let fetched = state.service_repo().list_validated().await?;
    let pipeline = ListingPipeline::new(order::newest_service_first);
    let filtered = pipeline.run(fetched, &criteria);

    let response = ListResponse::paginate(filtered, query.limit, query.offset)?;
    info!(
        returned_count = response.items.len(),
        total = response.total,
        "Successfully retrieved service list"
    );
    Ok(ResponseJson(response))
}

/// Moderation queue: everything still waiting for an admin decision.
#[instrument(skip_all)]
async fn list_pending_services<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<ListResponse<Service>>, ApiError> {
    let pending = state.service_repo().list_pending().await?;
    let total = pending.len();
    Ok(ResponseJson(ListResponse {
        limit: total.max(1),
        offset: 0,
        total,
        items: pending,
    }))
}

#[instrument(skip_all, fields(title = %payload.title, city = %payload.city))]
async fn create_service<S: AppState>(
    State(state): State<S>,
    Json(payload): Json<NewService>,
) -> Result<ResponseJson<Service>, ApiError> {
    let new_service = payload.validated_input()?;
    let service = state.service_repo().create(&new_service).await?;
    info!(id = service.id, "Created service, awaiting validation");
    Ok(ResponseJson(service))
}

#[instrument(skip_all, fields(id = %id))]
async fn get_service<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<Service>, ApiError> {
    let service = state.service_repo().find_by_id(id).await?;
    service.map(ResponseJson).ok_or(ApiError::NotFound)
}

#[instrument(skip_all, fields(id = %id))]
async fn update_service<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(changes): Json<ServiceChanges>,
) -> Result<ResponseJson<Service>, ApiError> {
    let now = Utc::now().naive_utc();
    let service = state.service_repo().update(id, &changes, now).await?;
    info!(id = service.id, "Updated service");
    Ok(ResponseJson(service))
}

#[instrument(skip_all, fields(id = %id))]
async fn delete_service<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    state.service_repo().delete(id).await?;
    info!(id, "Deleted service");
    Ok(ResponseJson(serde_json::json!({ "deleted": id })))
}

#[derive(Debug, Deserialize)]
struct ValidateRequest {
    admin_external_id: String,
}

/// Admin approval: flips the service into the publicly visible set and
/// records who approved it and when.
#[instrument(skip_all, fields(id = %id))]
async fn validate_service<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
    Json(payload): Json<ValidateRequest>,
) -> Result<ResponseJson<Service>, ApiError> {
    let user_repo = state.user_repo();
    let admin = user_repo
        .find_by_external_id(&payload.admin_external_id)
        .await?
        .filter(|user| user.is_admin);

    let Some(admin) = admin else {
        warn!(
            external_id = %payload.admin_external_id,
            "Rejected validation attempt by non-admin"
        );
        return Err(ApiError::Forbidden);
    };

    let service = state
        .service_repo()
        .validate(id, admin.id, Utc::now().naive_utc())
        .await?;
    info!(id = service.id, admin_id = admin.id, "Validated service");
    Ok(ResponseJson(service))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/services",
            get(list_services::<S>).post(create_service::<S>),
        )
        .route("/services/pending", get(list_pending_services::<S>))
        .route(
            "/services/{id}",
            get(get_service::<S>)
                .put(update_service::<S>)
                .delete(delete_service::<S>),
        )
        .route("/services/{id}/validate", post(validate_service::<S>))
}
