//! Google provider against the stub upstream.

use std::sync::Arc;

use serde_json::json;
use trendscope_trends::{
    GoogleTrendsProvider, RelatedKind, SearchVolumePoint, TrendsError, TrendsService,
};

use crate::upstream_stub::{STUB_API_KEY, UpstreamStub, values_of};

fn service_for(stub: &UpstreamStub) -> TrendsService {
    let provider = GoogleTrendsProvider::new(stub.config()).unwrap();
    TrendsService::with_provider(Arc::new(provider))
}

async fn fetch(
    service: &TrendsService,
    geo_restriction: &str,
    option: &str,
) -> Result<Vec<SearchVolumePoint>, TrendsError> {
    service
        .get_search_volumes(
            vec!["flu".to_string(), "cold".to_string()],
            "2020-01-01".to_string(),
            "2020-01-03".to_string(),
            "day".to_string(),
            geo_restriction,
            option.to_string(),
        )
        .await
}

#[tokio::test]
async fn test_flu_scenario_over_http() {
    let stub = UpstreamStub::start_flu().await;
    let service = service_for(&stub);

    let records = fetch(&service, "country", "US").await.unwrap();

    assert_eq!(
        records,
        vec![
            SearchVolumePoint {
                term: "flu".to_string(),
                date: "2020-01-01".to_string(),
                value: 10.into(),
            },
            SearchVolumePoint {
                term: "flu".to_string(),
                date: "2020-01-02".to_string(),
                value: 12.into(),
            },
        ]
    );
}

#[tokio::test]
async fn test_request_parameters_on_the_wire() {
    let stub = UpstreamStub::start_flu().await;
    let service = service_for(&stub);

    fetch(&service, "dma", "501").await.unwrap();

    let queries = stub.timeline_queries().await;
    assert_eq!(queries.len(), 1);
    let pairs = &queries[0];

    assert_eq!(values_of(pairs, "terms"), vec!["flu", "cold"]);
    assert_eq!(values_of(pairs, "time.startDate"), vec!["2020-01-01"]);
    assert_eq!(values_of(pairs, "time.endDate"), vec!["2020-01-03"]);
    assert_eq!(values_of(pairs, "timelineResolution"), vec!["day"]);
    assert_eq!(values_of(pairs, "geoRestriction.dma"), vec!["501"]);
    assert!(values_of(pairs, "geoRestriction.country").is_empty());
    assert!(values_of(pairs, "geoRestriction.region").is_empty());
    assert_eq!(values_of(pairs, "key"), vec![STUB_API_KEY]);
}

#[tokio::test]
async fn test_each_geo_kind_sends_only_its_field() {
    let stub = UpstreamStub::start_flu().await;
    let service = service_for(&stub);

    let cases = [
        ("country", "US", "geoRestriction.country"),
        ("dma", "501", "geoRestriction.dma"),
        ("region", "US-NY", "geoRestriction.region"),
    ];

    for (kind, option, _) in cases {
        fetch(&service, kind, option).await.unwrap();
    }

    let queries = stub.timeline_queries().await;
    assert_eq!(queries.len(), cases.len());

    for (pairs, (_, option, param)) in queries.iter().zip(cases) {
        let geo: Vec<&str> = pairs
            .iter()
            .map(|(name, _)| name.as_str())
            .filter(|name| name.starts_with("geoRestriction."))
            .collect();
        assert_eq!(geo, vec![param]);
        assert_eq!(values_of(pairs, param), vec![option]);
    }
}

#[tokio::test]
async fn test_discovery_fetched_once_per_provider() {
    let stub = UpstreamStub::start_flu().await;
    let service = service_for(&stub);

    fetch(&service, "country", "US").await.unwrap();
    fetch(&service, "region", "US-CA").await.unwrap();

    assert_eq!(stub.discovery_hits(), 1);
    assert_eq!(stub.timeline_queries().await.len(), 2);
}

#[tokio::test]
async fn test_unknown_geo_kind_never_reaches_upstream() {
    let stub = UpstreamStub::start_flu().await;
    let service = service_for(&stub);

    let err = fetch(&service, "city", "NYC").await.unwrap_err();

    assert!(err.is_client_error());
    assert_eq!(stub.discovery_hits(), 0);
    assert!(stub.timeline_queries().await.is_empty());
}

#[tokio::test]
async fn test_rejected_key_surfaces_upstream_error() {
    let stub = UpstreamStub::start_flu().await;
    let config = stub.config();
    let config = trendscope_core::TrendsApiConfig {
        api_key: "wrong-key".to_string(),
        ..config
    };
    let service = TrendsService::with_provider(Arc::new(GoogleTrendsProvider::new(config).unwrap()));

    let err = fetch(&service, "country", "US").await.unwrap_err();

    match err {
        TrendsError::UpstreamError { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("API key not valid"));
        }
        other => panic!("Expected UpstreamError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_lines_yield_no_records() {
    let stub = UpstreamStub::start(json!({
        "lines": [{"term": "flu", "points": []}, {"term": "cold"}]
    }))
    .await;
    let service = service_for(&stub);

    let records = fetch(&service, "country", "US").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn test_related_dispatches_by_kind() {
    let stub = UpstreamStub::start_flu().await;
    let service = service_for(&stub);

    for kind in [RelatedKind::Topic, RelatedKind::Query] {
        let response = service
            .get_related(
                "flu".to_string(),
                "US".to_string(),
                "2020-01".to_string(),
                "2020-02".to_string(),
                kind,
            )
            .await
            .unwrap();
        assert_eq!(response["item"][0]["title"], "Influenza");
    }

    let related = stub.log.related_queries.lock().await.clone();
    assert_eq!(related.len(), 2);
    assert_eq!(related[0].0, "topTopics");
    assert_eq!(related[1].0, "topQueries");
    assert_eq!(values_of(&related[0].1, "term"), vec!["flu"]);
    assert_eq!(values_of(&related[0].1, "restrictions.geo"), vec!["US"]);
    assert_eq!(values_of(&related[1].1, "restrictions.startDate"), vec!["2020-01"]);
    assert_eq!(values_of(&related[1].1, "restrictions.endDate"), vec!["2020-02"]);
}
