use axum::{
    Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use tracing::debug;

use crate::AppState;
use crate::errors::ApiError;
use crate::saved::SavedItemsStore;

async fn list_saved<S: AppState>(
    State(state): State<S>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    let ids = state.saved_items().saved_ids();
    Ok(ResponseJson(serde_json::json!({ "ids": ids })))
}

async fn toggle_saved<S: AppState>(
    State(state): State<S>,
    Path(id): Path<i32>,
) -> Result<ResponseJson<serde_json::Value>, ApiError> {
    let saved = state.saved_items().toggle(id);
    debug!(id, saved, "Toggled saved item");
    Ok(ResponseJson(serde_json::json!({ "id": id, "saved": saved })))
}

pub fn router<S: AppState>() -> Router<S> {
    Router::new()
        .route("/saved", get(list_saved::<S>))
        .route("/saved/{id}", post(toggle_saved::<S>))
}
