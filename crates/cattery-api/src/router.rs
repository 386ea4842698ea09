// ============================================================================
// Cattery API - Router
// File: crates/cattery-api/src/router.rs
// ============================================================================

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use cattery_shared::config::CorsSettings;

use crate::handlers::{self, cats, health, root};
use crate::state::AppState;

/// Full application router with shared state and middleware applied.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let api_routes: [(&str, MethodRouter<AppState>); 10] = [
        ("/api/", get(root::api_root)),
        ("/api/cats/", get(cats::list_cats).post(cats::create_cat)),
        ("/api/cats/search/", get(cats::search_cats)),
        ("/api/cats/available/", get(cats::available_cats)),
        ("/api/cats/adopted/", get(cats::adopted_cats)),
        ("/api/cats/statistics/", get(cats::statistics)),
        ("/api/cats/breeds/", get(cats::breeds)),
        ("/api/cats/{id}/", get(cats::get_cat)),
        ("/api/cats/{id}/adopt/", post(cats::adopt_cat)),
        ("/api/cats/{id}/return_to_shelter/", post(cats::return_to_shelter)),
    ];
    let api_routes = api_routes
        .into_iter()
        .fold(Router::new(), |router, (path, handler)| {
            with_and_without_slash(router, path, handler)
        });

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        // CORS
        .layer(cors)
        // Request ids: set outermost so the trace span and response both see it
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

fn with_and_without_slash(
    router: Router<AppState>,
    path: &str,
    handler: MethodRouter<AppState>,
) -> Router<AppState> {
    let bare = path.trim_end_matches('/');
    router
        .route(bare, handler.clone())
        .route(&format!("{}/", bare), handler)
}

fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if settings.allowed_origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use chrono::{NaiveDate, Utc};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use cattery_core::domain::Cat;
    use cattery_infrastructure::MemoryCatRepository;
    use cattery_shared::config::AppConfig;

    use super::*;

    struct TestApp {
        router: Router,
        repo: Arc<MemoryCatRepository>,
    }

    impl TestApp {
        fn new() -> Self {
            let repo = Arc::new(MemoryCatRepository::new());
            let config = AppConfig::from_defaults().unwrap();
            let state = AppState::new(repo.clone(), config);
            Self { router: build_router(state), repo }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }

        async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            let request = Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap();
            self.send(request).await
        }

        fn seed(&self, id: i32, name: &str, breed: Option<&str>, age: Option<i32>) {
            self.repo.insert(Cat {
                id,
                name: name.to_string(),
                breed: breed.map(str::to_string),
                age,
                color: None,
                weight: None,
                is_neutered: false,
                owner_name: None,
                adoption_date: None,
                description: None,
                created_at: Utc::now(),
            });
        }
    }

    #[tokio::test]
    async fn test_health_and_root() {
        let app = TestApp::new();
        let (status, body) = app.get("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");

        let (status, _) = app.get("/health/ready").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = app.get("/api/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["endpoints"]["cats"], "/api/cats/");
    }

    #[tokio::test]
    async fn test_routes_answer_with_and_without_trailing_slash() {
        let app = TestApp::new();
        assert_eq!(app.get("/api/cats").await.0, StatusCode::OK);
        assert_eq!(app.get("/api/cats/").await.0, StatusCode::OK);
        assert_eq!(app.get("/api/cats/statistics").await.0, StatusCode::OK);
        assert_eq!(app.get("/api/nothing/").await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_then_retrieve() {
        let app = TestApp::new();
        let (status, body) = app
            .post(
                "/api/cats/",
                json!({ "name": "whiskers", "breed": "persian", "age": 1, "weight": "4.20" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["cat"]["name"], "Whiskers");
        assert_eq!(body["cat"]["breed"], "Persian");
        assert_eq!(body["cat"]["age_display"], "1 year");
        assert_eq!(body["cat"]["weight_display"], "4.2 kg");
        assert_eq!(body["cat"]["status_display"], "Available");
        assert_eq!(body["cat"]["owner_name"], Value::Null);

        let id = body["cat"]["id"].as_i64().unwrap();
        let (status, body) = app.get(&format!("/api/cats/{}/", id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_adopted"], false);

        let (status, _) = app.get("/api/cats/9999/").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_rejects_weight_beyond_two_decimals() {
        let app = TestApp::new();
        for weight in [json!(0.001), json!("4.129")] {
            let (status, body) = app.post("/api/cats/", json!({ "name": "Tom", "weight": weight })).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body["fields"]["weight"][0],
                "Ensure that there are no more than 2 decimal places."
            );
        }
        assert!(app.repo.is_empty());

        let (status, body) = app.post("/api/cats/", json!({ "name": "Tom", "weight": "4.13" })).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["cat"]["weight_display"], "4.13 kg");
    }

    #[tokio::test]
    async fn test_search_by_name_breed_and_availability() {
        let app = TestApp::new();
        app.seed(1, "Whiskers", Some("Persian"), Some(3));
        app.seed(2, "Shadow", Some("Persian"), Some(5));
        app.seed(3, "Luna", Some("Siamese"), Some(2));
        app.repo.insert(Cat {
            id: 4,
            name: "Snow".into(),
            breed: None,
            age: None,
            color: Some("White".into()),
            weight: None,
            is_neutered: false,
            owner_name: Some("Alice".into()),
            adoption_date: NaiveDate::from_ymd_opt(2025, 11, 1),
            description: None,
            created_at: Utc::now(),
        });

        let (status, body) = app.get("/api/cats/search/?name=Whiskers").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Whiskers");

        let (_, body) = app.get("/api/cats/search/?breed=Persian").await;
        assert_eq!(body["count"], 2);

        let (_, body) = app.get("/api/cats/search/?available=true").await;
        assert_eq!(body["count"], 3);

        let (_, body) = app.get("/api/cats/search?available=no&color=whi").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Snow");
    }

    #[tokio::test]
    async fn test_create_validation_errors() {
        let app = TestApp::new();
        let (status, body) = app.post("/api/cats/", json!({ "name": " ", "age": 31 })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "ValidationError");
        assert!(body["fields"]["name"].is_array());
        assert!(body["fields"]["age"].is_array());

        app.post("/api/cats/", json!({ "name": "Tom" })).await;
        let (status, body) = app.post("/api/cats/", json!({ "name": "TOM" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"]["name"].is_array());

        let request = Request::post("/api/cats/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = app.send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "BadRequest");
    }

    #[tokio::test]
    async fn test_list_filters_are_conjunctive_and_paginated() {
        let app = TestApp::new();
        app.seed(1, "Tom", Some("Persian"), Some(3));
        app.seed(2, "Kit", Some("Siamese"), Some(1));
        app.seed(3, "Max", Some("Persian"), None);
        app.post("/api/cats/1/adopt/", json!({ "owner_name": "Alice" })).await;

        let (_, body) = app.get("/api/cats/?search=per").await;
        assert_eq!(body["count"], 2);

        let (_, body) = app.get("/api/cats/?breed=persian&status=available").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "Max");

        let (_, body) = app.get("/api/cats/adopted/").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["owner_name"], "Alice");

        let (_, body) = app.get("/api/cats/?ordering=-age&page_size=2").await;
        assert_eq!(body["count"], 3);
        assert_eq!(body["next"], 2);
        assert_eq!(body["previous"], Value::Null);
        assert_eq!(body["results"][0]["name"], "Tom");

        let (status, body) = app.get("/api/cats/?page=9").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(body["results"], json!([]));

        let (status, body) = app.get("/api/cats/?page=0").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 3);
        assert_eq!(body["results"], json!([]));

        let (status, body) = app.get("/api/cats/?page=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"]["page"].is_array());

        let (status, _) = app.get("/api/cats/?status=lost").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_adoption_flow_updates_statistics() {
        let app = TestApp::new();
        app.seed(1, "Tom", Some("Persian"), Some(2));
        app.seed(2, "Kit", Some("Siamese"), None);
        app.seed(3, "Max", None, Some(6));

        let (_, before) = app.get("/api/cats/statistics/").await;
        assert_eq!(before["total_cats"], 3);
        assert_eq!(before["adoption_rate"], 0.0);
        assert_eq!(before["average_age"], 4.0);
        assert_eq!(before["youngest_age"], 2);
        assert_eq!(before["oldest_age"], 6);

        let (status, body) = app
            .post("/api/cats/1/adopt/", json!({ "owner_name": "john doe" }))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Tom has been successfully adopted by John Doe!");
        assert_eq!(body["cat"]["status_display"], "Adopted");
        let today = Utc::now().date_naive().to_string();
        assert_eq!(body["cat"]["adoption_date"], today);

        let (_, after) = app.get("/api/cats/statistics/").await;
        assert_eq!(after["adopted_cats"], 1);
        assert_eq!(after["available_cats"], 2);
        assert_eq!(after["recent_adoptions"], 1);

        let (status, body) = app.post("/api/cats/1/adopt/", json!({ "owner_name": "Bob" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "InvalidState");

        let (status, _) = app.post("/api/cats/9999/adopt/", json!({ "owner_name": "Bob" })).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(app.get("/api/cats/statistics/").await.1, after);

        let (status, body) = app.post("/api/cats/1/return_to_shelter/", json!({})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["former_owner"], "John Doe");
        assert_eq!(body["cat"]["owner_name"], Value::Null);

        let (_, restored) = app.get("/api/cats/statistics/").await;
        assert_eq!(restored["available_cats"], 3);

        let (status, _) = app.post("/api/cats/1/return_to_shelter/", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_adopt_requires_owner_name_and_accepts_date() {
        let app = TestApp::new();
        app.seed(1, "Tom", None, None);

        let (status, body) = app.post("/api/cats/1/adopt/", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["fields"]["owner_name"].is_array());

        let (status, body) = app
            .post(
                "/api/cats/1/adopt/",
                json!({ "owner_name": "Alice", "adoption_date": "2025-11-03" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let expected = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap().to_string();
        assert_eq!(body["cat"]["adoption_date"], expected);
    }

    #[tokio::test]
    async fn test_breed_statistics_route() {
        let app = TestApp::new();
        app.seed(1, "Tom", Some("Persian"), Some(3));
        app.seed(2, "Kit", Some("Persian"), Some(4));
        app.seed(3, "Max", Some("Siamese"), None);

        let (status, body) = app.get("/api/cats/breeds/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["breed"], "Persian");
        assert_eq!(body[0]["count"], 2);
        assert_eq!(body[0]["average_age"], 3.5);
        assert_eq!(body[1]["breed"], "Siamese");
        assert_eq!(body[1]["average_age"], Value::Null);
    }
}
