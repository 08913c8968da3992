//! HTTP API.
//!
//! # Endpoints
//!
//! - `POST /calculo`         – submit an update for a key
//! - `GET  /resultados`      – every key's aggregates
//! - `GET  /resultados/{id}` – one key's aggregates

mod calculation;
mod error;
mod results;

use axum::Router;

use crate::state::AppState;

/// Build the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(calculation::router())
        .merge(results::router())
}
