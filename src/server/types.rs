//! Server state and error response types.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Deserialize;

use crate::client::CocktailSource;
use crate::config::CatalogConfig;
use crate::error::CocktailError;
use crate::model::ErrorBody;

/// Shared state for the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn CocktailSource>,
    pub catalog: CatalogConfig,
}

impl AppState {
    pub fn new(source: Arc<dyn CocktailSource>, catalog: CatalogConfig) -> Self {
        Self { source, catalog }
    }
}

/// `{ "message": ... }` response with a status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Mirrors the status of `err` and picks a user-facing message,
    /// `default` when the error has nothing better to say.
    pub fn from_error(err: &CocktailError, default: &str) -> Self {
        let status =
            StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(status, err.user_message(default))
    }

    /// Logs the failure, then converts it. Used by handlers as `map_err`.
    pub fn upstream<'a>(
        context: &'a str,
        default: &'static str,
    ) -> impl Fn(CocktailError) -> Self + 'a {
        move |err| {
            error!("Error in {}: {}", context, err);
            Self::from_error(&err, default)
        }
    }
}

/// Local conditions (`NotFound`, `InvalidRequest`) carry their own message.
impl From<CocktailError> for ApiError {
    fn from(err: CocktailError) -> Self {
        Self::from_error(&err, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    pub i: Option<String>,
}
