//! Postal code lookup HTTP API.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router, middleware};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::cep::{CepStatistics, ProviderStatus};
use crate::error::{Result, ServerError};

#[derive(Debug, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(custom(
        function = "crate::router::validate_cep",
        message = "Postal code must contain exactly 8 digits."
    ))]
    cep: String,
    /// Bypass the fallback loop and query one provider by key.
    provider: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub cep: String,
    pub address: String,
}

/// Handler to search an address, through the priority fallback loop or
/// directly against a named provider.
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Response>> {
    query.validate()?;

    let result = match query.provider.as_deref() {
        Some(key) => state.cep.search_with(&query.cep, key).await?,
        None => state.cep.search(&query.cep).await,
    };

    let address = result.ok_or(ServerError::NotFound)?;

    Ok(Json(Response {
        cep: address.cep.clone(),
        address: address.complete_address(),
    }))
}

/// Handler to probe every provider.
pub async fn availability(
    State(state): State<AppState>,
) -> Json<Vec<ProviderStatus>> {
    Json(state.cep.availability().await)
}

/// Handler for aggregate provider statistics.
pub async fn statistics(State(state): State<AppState>) -> Json<CepStatistics> {
    Json(state.cep.statistics().await)
}

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/search", get(search))
        .route("/availability", get(availability))
        .route("/statistics", get(statistics))
        .route_layer(middleware::from_fn(crate::middleware::require_admin))
        .route_layer(middleware::from_fn_with_state(state, crate::middleware::auth))
}
