//! JSON HTTP surface.
//!
//! Endpoints:
//! - `GET /api/cocktails` - full catalog, sorted by name
//! - `GET /api/cocktails/:id` - one cocktail
//! - `GET /api/cocktails/random` - a random cocktail
//! - `GET /api/cocktails/search?q=` - search by name
//! - `GET /api/cocktails/filter?i=` - drinks using an ingredient
//! - `GET /health`

mod handlers;
mod types;

use axum::http::header::{HeaderName, HeaderValue};
use axum::routing::get;
use axum::Router;
use log::{info, warn};
use tower_http::set_header::SetResponseHeaderLayer;

use handlers::{
    filter_handler, get_cocktail_handler, health_handler, list_all_handler, random_handler,
    search_handler,
};
pub use types::{ApiError, AppState};

use crate::config::AppConfig;

const SECURITY_HEADERS: [(&str, &str); 5] = [
    ("x-dns-prefetch-control", "on"),
    ("strict-transport-security", "max-age=31536000; includeSubDomains"),
    ("x-frame-options", "SAMEORIGIN"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
];

/// Builds the application router
pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/cocktails", get(list_all_handler))
        .route("/api/cocktails/random", get(random_handler))
        .route("/api/cocktails/search", get(search_handler))
        .route("/api/cocktails/filter", get(filter_handler))
        .route("/api/cocktails/:id", get(get_cocktail_handler))
        .with_state(state);

    for (name, value) in SECURITY_HEADERS {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }

    app
}

/// Binds `config.listen_addr` and serves until Ctrl-C
pub async fn start_server(
    config: &AppConfig,
    state: AppState,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", config.listen_addr, e))?;

    info!("Cocktail server listening on http://{}/", config.listen_addr);
    info!("  - Upstream: {}", config.base_url);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| format!("Server error: {}", e))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        // Without a signal handler, run until the process is killed
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
