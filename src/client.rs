use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::CocktailError;
use crate::model::{ApiResponse, RawDrinkRecord};

/// Upstream cocktail catalog.
///
/// Every call answers with the raw `{ "drinks": [...] | null }` envelope;
/// normalization happens in [`crate::transform`].
#[async_trait]
pub trait CocktailSource: Send + Sync {
    /// Drinks whose name contains `name`
    async fn search_by_name(&self, name: &str)
        -> Result<ApiResponse<RawDrinkRecord>, CocktailError>;

    /// A single random drink
    async fn random(&self) -> Result<ApiResponse<RawDrinkRecord>, CocktailError>;

    /// Full details for one drink id
    async fn lookup_by_id(&self, id: &str) -> Result<ApiResponse<RawDrinkRecord>, CocktailError>;

    /// Drinks that use `ingredient` (upstream only returns id, name and thumbnail)
    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<ApiResponse<RawDrinkRecord>, CocktailError>;

    /// Drinks whose name starts with `letter`
    async fn search_by_first_letter(
        &self,
        letter: char,
    ) -> Result<ApiResponse<RawDrinkRecord>, CocktailError>;
}

/// reqwest-backed client for TheCocktailDB
pub struct CocktailDbClient {
    client: Client,
    base_url: String,
}

impl CocktailDbClient {
    /// Create a client from configuration
    pub fn new(config: &AppConfig) -> Result<Self, CocktailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Cocktail API {} answered {}", endpoint, status);
            return Err(CocktailError::UpstreamError {
                status: status.as_u16(),
                message: upstream_message(&body),
            });
        }

        parse_envelope(&body)
    }
}

/// Pulls `message` out of a JSON error body, if the upstream sent one.
fn upstream_message(body: &str) -> Option<String> {
    serde_json::from_str::<Value>(body)
        .ok()?
        .get("message")?
        .as_str()
        .map(str::to_string)
}

/// TheCocktailDB sometimes answers a miss with an empty 200 body instead of
/// `{"drinks": null}`; both mean "no matches".
fn parse_envelope(body: &str) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
    if body.trim().is_empty() {
        return Ok(ApiResponse::empty());
    }
    serde_json::from_str(body).map_err(|e| CocktailError::ParseError(e.to_string()))
}

#[async_trait]
impl CocktailSource for CocktailDbClient {
    async fn search_by_name(
        &self,
        name: &str,
    ) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
        self.get("search.php", &[("s", name)]).await
    }

    async fn random(&self) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
        self.get("random.php", &[]).await
    }

    async fn lookup_by_id(&self, id: &str) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
        self.get("lookup.php", &[("i", id)]).await
    }

    async fn filter_by_ingredient(
        &self,
        ingredient: &str,
    ) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
        self.get("filter.php", &[("i", ingredient)]).await
    }

    async fn search_by_first_letter(
        &self,
        letter: char,
    ) -> Result<ApiResponse<RawDrinkRecord>, CocktailError> {
        let letter = letter.to_string();
        self.get("search.php", &[("f", letter.as_str())]).await
    }
}
