use axum::{
    Router,
    extract::{Json, Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::AppState;
use crate::errors::ApiError;
use crate::models::{NewUser, Service, User, UserProfileChanges};
use crate::repositories::{ServiceRepository, UserRepository};
use crate::validation::validate_email;

async fn get_profile<S: AppState>(
    State(state): State<S>,
    Path(external_id): Path<String>,
) -> Result<ResponseJson<User>, ApiError> {
    let user = state.user_repo().find_by_external_id(&external_id).await?;
    user.map(ResponseJson).ok_or(ApiError::NotFound)
}

#[derive(Debug, Deserialize)]
struct UpsertProfileRequest {
    email: String,
    name: Option<String>,
    city: Option<String>,
    bio: Option<String>,
}

/// Creates the profile on first sight of an identity, updates it
/// afterwards. The identity itself comes from the external provider;
/// this service only stores the projection.
#[instrument(skip_all, fields(external_id = %external_id))]
async fn upsert_profile<S: AppState>(
    State(state): State<S>,
    Path(external_id): Path<String>,
    Json(payload): Json<UpsertProfileRequest>,
) -> Result<ResponseJson<User>, ApiError> {
    let email = validate_email(&payload.email)?;
    let repo = state.user_repo();

    let user = match repo.find_by_external_id(&external_id).await? {
        Some(_) => {
            let changes = UserProfileChanges {
                name: payload.name,
                city: payload.city,
                bio: payload.bio,
                updated_at: Some(Utc::now().naive_utc()),
            };
            repo.update_profile(&external_id, &changes).await?
        }
        None => {
            let new_user = NewUser {
                external_id: external_id.clone(),
                email,
                name: payload.name,
                city: payload.city,
                bio: payload.bio,
            };
            let user = repo.create(&new_user).await?;
            info!(id = user.id, "Created profile");
            user
        }
    };

    Ok(ResponseJson(user))
}

/// Owner-scoped service list: the creator sees their own submissions
/// regardless of validation state.
#[instrument(skip_all, fields(external_id = %external_id))]
async fn list_own_services<S: AppState>(
    State(state): State<S>,
    Path(external_id): Path<String>,
) -> Result<ResponseJson<Vec<Service>>, ApiError> {
    let user = state
        .user_repo()
        .find_by_external_id(&external_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    let services = state.service_repo().list_by_owner(user.id).await?;
    Ok(ResponseJson(services))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/users/{external_id}",
            get(get_profile::<S>).put(upsert_profile::<S>),
        )
        .route("/users/{external_id}/services", get(list_own_services::<S>))
}
