//! JSON API server for Trendscope
//!
//! Every request is independent: handlers share only the trends service,
//! which holds the immutable configuration and the HTTP connection pool.

use axum::Router;
use axum::http::Request;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Level;
use trendscope_core::TrendscopeConfig;
use trendscope_trends::TrendsService;

use crate::errors::ServerError;
use crate::handlers::{api_search_volumes, health_check};

/// Shared application state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Trends adapter used by the search volume endpoint
    pub trends_service: TrendsService,
}

impl AppState {
    /// Creates state around an existing trends service.
    pub fn new(trends_service: TrendsService) -> Self {
        Self { trends_service }
    }
}

/// Build the complete API router.
///
/// # Route Structure
/// - `GET /health` - Health check
/// - `POST /api/search_volumes` - Flattened search volumes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/search_volumes", post(api_search_volumes))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and serve until the process exits.
///
/// # Errors
/// - `ServerError::Trends` - HTTP client for the Trends API could not be built
/// - `ServerError::Io` - Listener could not bind or serving failed
pub async fn run_server(config: TrendscopeConfig) -> Result<(), ServerError> {
    let trends_service = TrendsService::new(config.trends.clone())?;
    let app = router(AppState::new(trends_service));

    let listener = TcpListener::bind(&config.server.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        discovery_url = %config.trends.discovery_url(),
        "Trendscope API server listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use trendscope_trends::{
        GeoRestriction, MockTrendsProvider, TimelineLine, TimelinePoint, TimelineResponse,
    };

    use super::*;

    fn flu_mock() -> MockTrendsProvider {
        MockTrendsProvider::new(TimelineResponse {
            lines: vec![TimelineLine {
                term: "flu".to_string(),
                points: vec![
                    TimelinePoint {
                        date: "2020-01-01".to_string(),
                        value: 10.into(),
                    },
                    TimelinePoint {
                        date: "2020-01-02".to_string(),
                        value: 12.into(),
                    },
                ],
            }],
        })
    }

    fn app_with(mock: &MockTrendsProvider) -> Router {
        let service = TrendsService::with_provider(Arc::new(mock.clone()));
        router(AppState::new(service))
    }

    async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/search_volumes")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn flu_body() -> Value {
        json!({
            "terms": ["flu"],
            "start_date": "2020-01-01",
            "end_date": "2020-01-03",
            "frequency": "day",
            "geo_restriction": "country",
            "geo_restriction_option": "US"
        })
    }

    #[tokio::test]
    async fn test_search_volumes_flu_scenario() {
        let mock = flu_mock();
        let (status, body) = post_json(app_with(&mock), flu_body().to_string()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([
                {"term": "flu", "date": "2020-01-01", "value": 10},
                {"term": "flu", "date": "2020-01-02", "value": 12}
            ])
        );

        let calls = mock.timeline_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].geo, GeoRestriction::Country("US".to_string()));
    }

    #[tokio::test]
    async fn test_missing_terms_is_bad_request() {
        let mock = flu_mock();
        let mut body = flu_body();
        body.as_object_mut().unwrap().remove("terms");

        let (status, body) = post_json(app_with(&mock), body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
        assert!(body["message"].as_str().unwrap().contains("terms"));
        assert!(mock.timeline_calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let mock = flu_mock();
        let (status, body) = post_json(app_with(&mock), "{not json".to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_unknown_geo_restriction_is_bad_request() {
        let mock = flu_mock();
        let mut body = flu_body();
        body["geo_restriction"] = json!("continent");

        let (status, body) = post_json(app_with(&mock), body.to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["message"].as_str().unwrap().contains("continent"));
        assert!(mock.timeline_calls().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let mock = MockTrendsProvider::failing(500, "backend exploded");
        let (status, body) = post_json(app_with(&mock), flu_body().to_string()).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "upstream_error");
        assert!(!body.to_string().contains("backend exploded"));
    }

    #[tokio::test]
    async fn test_health_check() {
        let mock = flu_mock();
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app_with(&mock).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert!(mock.timeline_calls().is_empty());
    }
}
