mod search;

use std::sync::Arc;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use localeats_search::UpstreamClient;
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<UpstreamClient>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResponseMeta {
    fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn search_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/search/restaurants", post(search::search_restaurants))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(search_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: HealthData { status: "ok" },
            meta: ResponseMeta::new(req_id.0),
        }),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;
    use wiremock::matchers::{header as header_matcher, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::search::{FAILED_MESSAGE, FETCHED_MESSAGE, FOREIGN_ENDPOINT_MESSAGE, MALFORMED_MESSAGE};
    use super::*;

    const SEARCH_PATH: &str = "/v3/businesses/search";

    fn endpoint(server: &MockServer) -> String {
        format!("{}{SEARCH_PATH}", server.uri())
    }

    fn app_with_budget(server: &MockServer, max_requests: usize) -> Router {
        let upstream = UpstreamClient::new("test-key", &endpoint(server), 5, "localeats-test", 0, 0)
            .expect("client");
        build_app(
            AppState {
                upstream: Arc::new(upstream),
            },
            RateLimitState::new(max_requests, Duration::from_secs(60)),
        )
    }

    fn app(server: &MockServer) -> Router {
        app_with_budget(server, 100)
    }

    fn search_request(body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/search/restaurants")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[tokio::test]
    async fn health_returns_envelope() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .header("x-request-id", "req-1")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["meta"]["request_id"], "req-1");
    }

    #[tokio::test]
    async fn search_proxies_and_normalizes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(header_matcher("authorization", "bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 240,
                "businesses": [{
                    "id": "kinton-ramen",
                    "name": "Kinton Ramen",
                    "image_url": "https://img.test/kinton.jpg",
                    "categories": [{ "title": "Ramen" }],
                    "distance": 1500.0,
                    "rating": 4.0,
                    "price": "$$",
                    "is_closed": true
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api_string = format!("{}?limit=50&radius=10000", endpoint(&server));
        let response = app(&server)
            .oneshot(search_request(&serde_json::json!({ "apiString": api_string })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["message"], FETCHED_MESSAGE);
        assert_eq!(json["numberOfHits"], 240);
        let first = &json["results"][0];
        assert_eq!(first["storeID"], "kinton-ramen");
        assert_eq!(first["distance"], "1.5 km away");
        assert_eq!(first["priceLevel"], 2);
        assert_eq!(first["hours"], "Closed for now");
    }

    #[tokio::test]
    async fn zero_hits_is_created_with_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "total": 0, "businesses": [] })),
            )
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(search_request(&serde_json::json!({ "apiString": endpoint(&server) })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["numberOfHits"], 0);
        assert_eq!(json["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn foreign_api_string_is_refused_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(search_request(
                &serde_json::json!({ "apiString": "https://evil.test/steal?limit=50" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = json_body(response).await;
        assert_eq!(json["message"], FOREIGN_ENDPOINT_MESSAGE);
        assert!(json.get("results").is_none());
    }

    #[tokio::test]
    async fn upstream_failure_is_unprocessable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let response = app(&server)
            .oneshot(search_request(&serde_json::json!({ "apiString": endpoint(&server) })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["message"], FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn malformed_body_is_unprocessable() {
        let server = MockServer::start().await;
        let response = app(&server)
            .oneshot(search_request(&serde_json::json!({ "url": "nope" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["message"], MALFORMED_MESSAGE);
    }

    #[tokio::test]
    async fn search_route_is_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "total": 0, "businesses": [] })),
            )
            .mount(&server)
            .await;

        let app = app_with_budget(&server, 1);
        let body = serde_json::json!({ "apiString": endpoint(&server) });

        let first = app.clone().oneshot(search_request(&body)).await.expect("response");
        assert_eq!(first.status(), StatusCode::CREATED);
        let second = app.oneshot(search_request(&body)).await.expect("response");
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
