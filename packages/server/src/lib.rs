#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for tally.
//!
//! Accepts survey submissions and serves aggregated statistics and known
//! locality values as JSON. All state lives in the injected
//! [`DocumentStore`]; handlers share nothing else.

pub mod config;
mod handlers;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use tally_database::DocumentStore;

pub use config::ServerConfig;

/// Shared application state.
pub struct AppState {
    /// Document store holding surveys and the locality registry.
    pub store: Arc<dyn DocumentStore>,
}

/// Registers the JSON error handler and every `/api` route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handlers::json_error_handler))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(handlers::health))
                .service(
                    web::scope("/surveys")
                        .route("/add", web::post().to(handlers::add_survey))
                        .route("/getData", web::get().to(handlers::survey_stats))
                        .route(
                            "/getRatingsOverTime",
                            web::get().to(handlers::ratings_over_time),
                        ),
                )
                .route(
                    "/localities/{category}",
                    web::get().to(handlers::localities),
                ),
        );
}

/// Builds the CORS policy. An empty allow-list permits any origin.
fn cors(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::permissive();
    }

    allowed_origins.iter().fold(
        Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allow_any_header()
            .supports_credentials(),
        |cors, origin| cors.allowed_origin(origin),
    )
}

/// Starts the tally API server on the configured address.
///
/// This is a regular async function; the caller provides the runtime
/// (e.g. via `#[actix_web::main]`) and initializes logging.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(config: ServerConfig, store: Arc<dyn DocumentStore>) -> std::io::Result<()> {
    let state = web::Data::new(AppState { store });

    if config.allowed_origins.is_empty() {
        log::warn!("ALLOWED_ORIGINS not set; allowing cross-origin requests from any origin");
    }

    let ServerConfig {
        bind_addr,
        port,
        allowed_origins,
    } = config;

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(cors(&allowed_origins))
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((bind_addr, port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::http::header::{self, ContentType};
    use actix_web::test;
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use tally_database::memory::MemoryStore;
    use tally_database::{Document, StoreError};

    /// Store whose every operation fails.
    struct UnavailableStore;

    fn unavailable() -> StoreError {
        StoreError::Connection {
            message: "store unavailable".to_string(),
        }
    }

    #[async_trait]
    impl DocumentStore for UnavailableStore {
        async fn find(&self, _: &str, _: &str, _: &str) -> Result<Vec<Document>, StoreError> {
            Err(unavailable())
        }

        async fn get(&self, _: &str, _: &str) -> Result<Option<Document>, StoreError> {
            Err(unavailable())
        }

        async fn set(&self, _: &str, _: &str, _: Value) -> Result<(), StoreError> {
            Err(unavailable())
        }

        async fn add(&self, _: &str, _: Value) -> Result<String, StoreError> {
            Err(unavailable())
        }

        async fn all(&self, _: &str) -> Result<Vec<Document>, StoreError> {
            Err(unavailable())
        }
    }

    fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            store: Arc::new(MemoryStore::new()),
        })
    }

    fn survey(state: &str, city: &str, cleanliness: u32) -> Value {
        json!({
            "name": "Meera",
            "age": 31,
            "occupation": "Designer",
            "locality": { "state": state, "city": city, "area": "Central", "pincode": "411001" },
            "ratings": { "cleanliness": cleanliness, "airQuality": 3 },
            "amenities": { "hospital": 4 },
            "comments": " Good parks "
        })
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(App::new().app_data($state.clone()).configure(configure)).await
        };
    }

    #[actix_web::test]
    async fn missing_locality_is_bad_request() {
        let state = app_state();
        let app = app!(state);

        for uri in ["/api/surveys/getData", "/api/surveys/getRatingsOverTime"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{uri}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["error"], "locality query parameter is required");
        }
    }

    #[actix_web::test]
    async fn unknown_locality_yields_empty_results() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::get()
            .uri("/api/surveys/getData?locality=atlantis")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "success": true, "stats": null }));

        let req = test::TestRequest::get()
            .uri("/api/surveys/getRatingsOverTime?locality=atlantis")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({ "success": true, "data": [] }));
    }

    #[actix_web::test]
    async fn submitted_surveys_are_aggregated() {
        let state = app_state();
        let app = app!(state);

        for (city, cleanliness) in [("Pune", 3), ("Pune", 5), ("Mumbai", 1)] {
            let req = test::TestRequest::post()
                .uri("/api/surveys/add")
                .set_json(survey("Maharashtra", city, cleanliness))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "success": true }));
        }

        let req = test::TestRequest::get()
            .uri("/api/surveys/getData?locality=Pune")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["stats"]["ratingsAvg"]["cleanliness"], 4.0);
        assert_eq!(body["stats"]["ageDistribution"]["26-35"], 2);
        assert_eq!(body["stats"]["occupationDistribution"]["designer"], 2);
        assert_eq!(body["stats"]["comments"], json!(["Good parks", "Good parks"]));

        let req = test::TestRequest::get()
            .uri("/api/surveys/getData?locality=411001")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stats"]["ratingsAvg"]["cleanliness"], 3.0);

        let req = test::TestRequest::get()
            .uri("/api/surveys/getRatingsOverTime?locality=maharashtra")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let series = body.as_array().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0]["cleanliness"], 3.0);
        assert_eq!(series[0]["airQuality"], 3.0);
    }

    #[actix_web::test]
    async fn lists_registered_localities() {
        let state = app_state();
        let app = app!(state);

        for city in ["new delhi", "Agra"] {
            let req = test::TestRequest::post()
                .uri("/api/surveys/add")
                .set_json(survey("Uttar Pradesh", city, 4))
                .to_request();
            assert!(test::call_service(&app, req).await.status().is_success());
        }

        let req = test::TestRequest::get()
            .uri("/api/localities/cities")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(["Agra", "New Delhi"]));

        let req = test::TestRequest::get()
            .uri("/api/localities/states")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(["Uttar Pradesh"]));

        let req = test::TestRequest::get()
            .uri("/api/localities/pincodes")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!(["411001"]));

        let req = test::TestRequest::get()
            .uri("/api/localities/countries")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn rejects_invalid_submissions() {
        let state = app_state();
        let app = app!(state);

        let mut incomplete = survey("Goa", "Panaji", 3);
        incomplete.as_object_mut().unwrap().remove("locality");
        let req = test::TestRequest::post()
            .uri("/api/surveys/add")
            .set_json(incomplete)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "locality is required");

        let req = test::TestRequest::post()
            .uri("/api/surveys/add")
            .insert_header(ContentType::json())
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());

        assert!(state.store.all("surveys").await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn health_reports_version() {
        let state = app_state();
        let app = app!(state);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["healthy"], true);
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[actix_web::test]
    async fn store_failures_are_server_errors() {
        let state = web::Data::new(AppState {
            store: Arc::new(UnavailableStore),
        });
        let app = app!(state);

        let expected = json!({ "success": false, "error": "Connection error: store unavailable" });

        for uri in [
            "/api/surveys/getData?locality=pune",
            "/api/surveys/getRatingsOverTime?locality=pune",
            "/api/localities/states",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, expected, "{uri}");
        }

        let req = test::TestRequest::post()
            .uri("/api/surveys/add")
            .set_json(survey("Kerala", "Kochi", 4))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, expected);
    }

    #[actix_web::test]
    async fn cors_allow_list() {
        let state = app_state();
        let app = test::init_service(
            App::new()
                .wrap(cors(&["https://a.example".to_string()]))
                .app_data(state.clone())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://a.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://a.example"
        );

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://b.example"))
            .to_request();
        let status = match test::try_call_service(&app, req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn cors_without_allow_list_is_permissive() {
        let state = app_state();
        let app = test::init_service(
            App::new()
                .wrap(cors(&[]))
                .app_data(state.clone())
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/health")
            .insert_header((header::ORIGIN, "https://anywhere.example"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://anywhere.example"
        );
    }
}
