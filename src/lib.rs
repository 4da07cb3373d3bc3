//! Cocktail recipe browsing on top of TheCocktailDB.
//!
//! The crate fetches drinks from the public API, normalizes its loosely
//! typed records into [`Cocktail`] / [`CocktailListItem`] values, and can
//! build the full catalog with a batched A-Z sweep. The [`server`] module
//! exposes all of it as a small JSON HTTP service.
//!
//! # Example
//! ```no_run
//! # #[tokio::main]
//! # async fn main() -> Result<(), cocktail_finder::CocktailError> {
//! let client = cocktail_finder::CocktailDbClient::new(&Default::default())?;
//! let results = cocktail_finder::search_cocktails(&client, "margarita").await?;
//! println!("{} matches", results.total);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod server;
pub mod transform;

pub use catalog::{CatalogAggregator, CatalogOutcome};
pub use client::{CocktailDbClient, CocktailSource};
pub use config::{AppConfig, CatalogConfig};
pub use error::CocktailError;
pub use model::{
    ApiResponse, Cocktail, CocktailListItem, ErrorBody, Ingredient, RawDrinkRecord, SearchResults,
};
pub use transform::{
    extract_ingredients, transform_api_response, transform_cocktail, transform_list_item,
};

use log::debug;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Fetches one cocktail by id; `Ok(None)` when the id is unknown.
pub async fn fetch_cocktail_by_id(
    source: &dyn CocktailSource,
    id: &str,
) -> Result<Option<Cocktail>, CocktailError> {
    let data = source.lookup_by_id(id).await?;
    Ok(transform_api_response(data, |drink| transform_cocktail(&drink))
        .into_iter()
        .next())
}

/// Fetches a random cocktail; `Ok(None)` if the API returned nothing.
pub async fn fetch_random_cocktail(
    source: &dyn CocktailSource,
) -> Result<Option<Cocktail>, CocktailError> {
    let data = source.random().await?;
    Ok(transform_api_response(data, |drink| transform_cocktail(&drink))
        .into_iter()
        .next())
}

/// Searches cocktails by name
pub async fn search_cocktails(
    source: &dyn CocktailSource,
    query: &str,
) -> Result<SearchResults, CocktailError> {
    let data = source.search_by_name(query).await?;
    let cocktails = transform_api_response(data, |drink| transform_list_item(&drink));
    debug!("Search '{}' matched {} cocktails", query, cocktails.len());
    Ok(SearchResults::from(cocktails))
}

/// Builds the full catalog with default batching.
///
/// Returns `Ok(None)` if `cancel` fired before the sweep finished.
pub async fn list_all_cocktails(
    source: Arc<dyn CocktailSource>,
    cancel: &CancellationToken,
) -> Result<Option<Vec<CocktailListItem>>, CocktailError> {
    let aggregator = CatalogAggregator::new(source, &CatalogConfig::default());
    let outcome = aggregator.fetch_all(cancel, |_| {}).await?;
    Ok(outcome.into_items())
}
