//! HTTP API end to end: client -> trendscope-web -> Google provider -> stub.

use serde_json::{Value, json};
use tokio::net::TcpListener;
use trendscope_core::TrendscopeConfig;
use trendscope_trends::TrendsService;
use trendscope_web::{AppState, router};

use crate::upstream_stub::UpstreamStub;

/// Start the API on an ephemeral port, backed by `stub`.
async fn start_api(stub: &UpstreamStub) -> String {
    let service = TrendsService::new(stub.config()).unwrap();
    let app = router(AppState::new(service));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
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
async fn test_search_volumes_round_trip() {
    let stub = UpstreamStub::start_flu().await;
    let base = start_api(&stub).await;

    let response = reqwest::Client::new()
        .post(format!("{base}/api/search_volumes"))
        .json(&flu_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let text = response.text().await.unwrap();
    assert!(text.contains(r#""value":10}"#), "integer value rewritten: {text}");
    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        body,
        json!([
            {"term": "flu", "date": "2020-01-01", "value": 10},
            {"term": "flu", "date": "2020-01-02", "value": 12}
        ])
    );
}

#[tokio::test]
async fn test_missing_terms_is_client_error() {
    let stub = UpstreamStub::start_flu().await;
    let base = start_api(&stub).await;

    let mut body = flu_body();
    body.as_object_mut().unwrap().remove("terms");

    let response = reqwest::Client::new()
        .post(format!("{base}/api/search_volumes"))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert!(response.status().is_client_error());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "bad_request");
    assert!(stub.timeline_queries().await.is_empty());
}

#[tokio::test]
async fn test_upstream_rejection_is_gateway_error() {
    let stub = UpstreamStub::start_flu().await;
    let mut config = stub.config();
    config.api_key = "revoked".to_string();

    let app = router(AppState::new(TrendsService::new(config).unwrap()));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/search_volumes"))
        .json(&flu_body())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    assert_eq!(stub.timeline_queries().await.len(), 1);
}

#[test]
fn test_missing_api_key_blocks_startup() {
    let result = TrendscopeConfig::from_lookup(|key| match key {
        "TRENDS_SERVER_URL" => Some("http://127.0.0.1:1".to_string()),
        _ => None,
    });
    assert!(matches!(
        result,
        Err(trendscope_core::ConfigError::MissingApiKey)
    ));
}
