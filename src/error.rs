use thiserror::Error;

/// Errors that can occur while talking to the cocktail API or serving requests
#[derive(Error, Debug)]
pub enum CocktailError {
    /// Transport failure or a response body that could not be decoded
    #[error("Failed to fetch from cocktail API: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The upstream API answered with a non-success status
    #[error("Cocktail API returned status {status}")]
    UpstreamError {
        status: u16,
        /// `message` field of the upstream error body, when there was one
        message: Option<String>,
    },

    /// The upstream body was not the JSON we expected
    #[error("Failed to parse cocktail API response: {0}")]
    ParseError(String),

    /// A single-record lookup matched nothing
    #[error("{0}")]
    NotFound(String),

    /// Missing or blank request parameter
    #[error("{0}")]
    InvalidRequest(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

impl CocktailError {
    /// HTTP status to mirror back to our own callers.
    pub fn status(&self) -> u16 {
        match self {
            CocktailError::FetchError(e) => e.status().map(|s| s.as_u16()).unwrap_or(500),
            CocktailError::UpstreamError { status, .. } => *status,
            CocktailError::NotFound(_) => 404,
            CocktailError::InvalidRequest(_) => 400,
            CocktailError::ParseError(_) | CocktailError::ConfigError(_) => 500,
        }
    }

    /// Message suitable for end users, falling back to `default` when the
    /// error carries nothing better.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            CocktailError::UpstreamError {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            CocktailError::UpstreamError { .. } => default.to_string(),
            CocktailError::NotFound(msg) | CocktailError::InvalidRequest(msg) => msg.clone(),
            // Transport errors carry upstream URLs, which users should not see
            CocktailError::FetchError(_)
            | CocktailError::ParseError(_)
            | CocktailError::ConfigError(_) => default.to_string(),
        }
    }
}
