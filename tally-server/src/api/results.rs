//! Read-only views of the aggregate table.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tally_sdk::objects::{CalculationResult, SnapshotResponse};

use super::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/resultados", get(list_results))
        .route("/resultados/{id}", get(get_result))
}

/// `GET /resultados` – every key, ordered by ID.
async fn list_results(State(state): State<AppState>) -> Json<SnapshotResponse> {
    let results = state
        .store
        .snapshot()
        .into_iter()
        .map(CalculationResult::from)
        .collect();

    Json(SnapshotResponse {
        taken_at: time::OffsetDateTime::now_utc().unix_timestamp(),
        results,
    })
}

/// `GET /resultados/{id}` – 404 until the key has received an update.
async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CalculationResult>, ApiError> {
    state
        .store
        .get(&id)
        .map(|s| Json(s.into()))
        .ok_or(ApiError::NotFound(id))
}
