use std::sync::Arc;
use std::time::Duration;

use cocktail_finder::server::{router, AppState};
use cocktail_finder::{CatalogConfig, Cocktail, CocktailDbClient, ErrorBody, SearchResults};
use mockito::{Matcher, ServerGuard};

/// Starts our router on a random local port, pointed at the mock upstream.
async fn spawn_app(upstream: &ServerGuard) -> String {
    spawn_app_with(
        upstream,
        CatalogConfig {
            batch_size: 5,
            batch_delay_ms: 0,
        },
    )
    .await
}

async fn spawn_app_with(upstream: &ServerGuard, catalog: CatalogConfig) -> String {
    let client = CocktailDbClient::with_base_url(upstream.url());
    let state = AppState::new(Arc::new(client), catalog);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    format!("http://{}", addr)
}

const MARGARITA: &str = r#"{
    "drinks": [{
        "idDrink": "11007",
        "strDrink": "Margarita",
        "strDrinkThumb": "https://www.thecocktaildb.com/images/media/drink/5noda61589575158.jpg",
        "strCategory": "Ordinary Drink",
        "strGlass": "Cocktail glass",
        "strInstructions": "Rub the rim of the glass with the lime slice.",
        "strTags": "IBA,ContemporaryClassic",
        "strIngredient1": "Tequila",
        "strMeasure1": "1 1/2 oz ",
        "strIngredient2": "Triple sec",
        "strMeasure2": "1/2 oz ",
        "strIngredient3": "Lime juice",
        "strMeasure3": "1 oz ",
        "strIngredient4": "Salt",
        "strMeasure4": null,
        "strIngredient5": null,
        "strMeasure5": null
    }]
}"#;

#[tokio::test]
async fn test_get_cocktail_by_id() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "11007".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(MARGARITA)
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails/11007", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );

    let cocktail: Cocktail = response.json().await.unwrap();
    assert_eq!(cocktail.id, "11007");
    assert_eq!(cocktail.name, "Margarita");
    assert_eq!(cocktail.tags, vec!["IBA", "ContemporaryClassic"]);
    assert_eq!(cocktail.ingredients.len(), 4);
    assert_eq!(cocktail.ingredients[0].measure, "1 1/2 oz");
    assert_eq!(cocktail.ingredients[3].name, "Salt");
    assert_eq!(cocktail.ingredients[3].measure, "");
}

#[tokio::test]
async fn test_unknown_id_is_404() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/lookup.php")
        .match_query(Matcher::UrlEncoded("i".into(), "999999".into()))
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails/999999", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.message, "Cocktail not found");
}

#[tokio::test]
async fn test_random_cocktail() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(MARGARITA)
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails/random", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let cocktail: Cocktail = response.json().await.unwrap();
    assert_eq!(cocktail.glass, "Cocktail glass");
}

#[tokio::test]
async fn test_random_with_no_drinks_is_404() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/random.php")
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails/random", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.message, "No cocktail found");
}

#[tokio::test]
async fn test_search() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "rita".into()))
        .with_status(200)
        .with_body(
            r#"{"drinks": [
                {"idDrink": "11007", "strDrink": "Margarita", "strCategory": "Ordinary Drink"},
                {"idDrink": "11118", "strDrink": "Blue Margarita", "strCategory": null}
            ]}"#,
        )
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails/search?q=rita", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let results: SearchResults = response.json().await.unwrap();
    assert_eq!(results.total, 2);
    assert_eq!(results.cocktails[0].name, "Margarita");
    assert_eq!(results.cocktails[1].category, "");
}

#[tokio::test]
async fn test_search_no_matches_is_empty_not_error() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/search.php")
        .match_query(Matcher::UrlEncoded("s".into(), "zzzz".into()))
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let results: SearchResults = reqwest::get(format!("{}/api/cocktails/search?q=zzzz", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(results.total, 0);
    assert!(results.cocktails.is_empty());
}

#[tokio::test]
async fn test_search_requires_query() {
    let upstream = mockito::Server::new_async().await;
    let base = spawn_app(&upstream).await;

    for url in [
        format!("{}/api/cocktails/search", base),
        format!("{}/api/cocktails/search?q=%20%20", base),
    ] {
        let response = reqwest::get(url).await.unwrap();
        assert_eq!(response.status(), 400);
        let body: ErrorBody = response.json().await.unwrap();
        assert_eq!(body.message, "Query parameter q is required");
    }
}

#[tokio::test]
async fn test_upstream_failure_status_is_mirrored() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/search.php")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails/search?q=gin", base))
        .await
        .unwrap();

    assert_eq!(response.status(), 503);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(body.message, "Failed to search cocktails");
}

#[tokio::test]
async fn test_filter_by_ingredient() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/filter.php")
        .match_query(Matcher::UrlEncoded("i".into(), "Gin".into()))
        .with_status(200)
        .with_body(
            r#"{"drinks": [
                {"strDrink": "3-Mile Long Island Iced Tea", "strDrinkThumb": "x.jpg", "idDrink": "15300"}
            ]}"#,
        )
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let results: SearchResults = reqwest::get(format!("{}/api/cocktails/filter?i=Gin", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(results.total, 1);
    assert_eq!(results.cocktails[0].id, "15300");
    assert_eq!(results.cocktails[0].category, "");
}

#[tokio::test]
async fn test_catalog_failure_is_single_message() {
    let mut upstream = mockito::Server::new_async().await;
    let _m = upstream
        .mock("GET", "/search.php")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let base = spawn_app(&upstream).await;
    let response = reqwest::get(format!("{}/api/cocktails", base)).await.unwrap();

    assert_eq!(response.status(), 500);
    let body: ErrorBody = response.json().await.unwrap();
    assert_eq!(
        body.message,
        "Failed to fetch cocktails. Please try again later."
    );
}

#[tokio::test]
async fn test_catalog_sweep_stops_when_client_disconnects() {
    let mut upstream = mockito::Server::new_async().await;
    let first_batch = upstream
        .mock("GET", "/search.php")
        .match_query(Matcher::Regex("^f=[A-E]$".into()))
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .expect(5)
        .create_async()
        .await;
    let later_batches = upstream
        .mock("GET", "/search.php")
        .match_query(Matcher::Regex("^f=[F-Z]$".into()))
        .with_status(200)
        .with_body(r#"{"drinks": null}"#)
        .expect(0)
        .create_async()
        .await;

    // The pause after the first batch outlasts the client's patience
    let base = spawn_app_with(
        &upstream,
        CatalogConfig {
            batch_size: 5,
            batch_delay_ms: 1_500,
        },
    )
    .await;

    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(500))
        .build()
        .unwrap();
    let result = client.get(format!("{}/api/cocktails", base)).send().await;
    assert!(result.unwrap_err().is_timeout());

    // Past the point where the second batch would have started
    tokio::time::sleep(Duration::from_millis(2_000)).await;

    first_batch.assert_async().await;
    later_batches.assert_async().await;
}

#[tokio::test]
async fn test_health() {
    let upstream = mockito::Server::new_async().await;
    let base = spawn_app(&upstream).await;
    let body = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "ok");
}
