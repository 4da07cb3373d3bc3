//! HTTP handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{debug, error, info};
use tokio_util::sync::CancellationToken;

use super::types::{ApiError, AppState, FilterParams, SearchParams};
use crate::catalog::{CatalogAggregator, CatalogOutcome};
use crate::error::CocktailError;
use crate::model::{Cocktail, SearchResults};
use crate::transform::{transform_api_response, transform_list_item};
use crate::{fetch_cocktail_by_id, fetch_random_cocktail, search_cocktails};

const DETAIL_FAILED: &str = "Failed to fetch cocktail details";
const RANDOM_FAILED: &str = "Failed to fetch random cocktail";
const SEARCH_FAILED: &str = "Failed to search cocktails";
const CATALOG_FAILED: &str = "Failed to fetch cocktails. Please try again later.";

pub async fn health_handler() -> &'static str {
    "ok"
}

/// GET /api/cocktails/:id
pub async fn get_cocktail_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cocktail>, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(CocktailError::InvalidRequest("Cocktail ID is required".into()).into());
    }

    let context = format!("cocktail detail for ID {}", id);
    fetch_cocktail_by_id(state.source.as_ref(), id)
        .await
        .map_err(ApiError::upstream(&context, DETAIL_FAILED))?
        .map(Json)
        .ok_or_else(|| CocktailError::NotFound("Cocktail not found".into()).into())
}

/// GET /api/cocktails/random
pub async fn random_handler(State(state): State<AppState>) -> Result<Json<Cocktail>, ApiError> {
    fetch_random_cocktail(state.source.as_ref())
        .await
        .map_err(ApiError::upstream("random cocktail", RANDOM_FAILED))?
        .map(Json)
        .ok_or_else(|| CocktailError::NotFound("No cocktail found".into()).into())
}

/// GET /api/cocktails/search?q=
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| CocktailError::InvalidRequest("Query parameter q is required".into()))?;

    search_cocktails(state.source.as_ref(), query)
        .await
        .map(Json)
        .map_err(ApiError::upstream("cocktail search", SEARCH_FAILED))
}

/// GET /api/cocktails/filter?i=
pub async fn filter_handler(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<SearchResults>, ApiError> {
    let ingredient = params
        .i
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .ok_or_else(|| CocktailError::InvalidRequest("Query parameter i is required".into()))?;

    let data = state
        .source
        .filter_by_ingredient(ingredient)
        .await
        .map_err(ApiError::upstream("ingredient filter", SEARCH_FAILED))?;

    let cocktails = transform_api_response(data, |drink| transform_list_item(&drink));
    Ok(Json(SearchResults::from(cocktails)))
}

/// GET /api/cocktails
///
/// Runs the full A-Z sweep. If the client goes away, axum drops this future;
/// the drop guard then cancels the sweep so no further batches are issued.
pub async fn list_all_handler(State(state): State<AppState>) -> Response {
    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let aggregator = CatalogAggregator::new(Arc::clone(&state.source), &state.catalog);
    let result = aggregator
        .fetch_all(&cancel, |progress| debug!("Catalog progress: {}%", progress))
        .await;
    guard.disarm();

    match result {
        Ok(CatalogOutcome::Complete(items)) => {
            info!("Serving catalog of {} cocktails", items.len());
            Json(SearchResults::from(items)).into_response()
        }
        // Nobody is waiting for this response any more
        Ok(CatalogOutcome::Cancelled) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => {
            error!("Error fetching cocktail catalog: {}", err);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, CATALOG_FAILED).into_response()
        }
    }
}
