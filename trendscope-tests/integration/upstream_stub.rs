//! In-process stub of the Trends API and its discovery document.

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use trendscope_core::TrendsApiConfig;

pub const STUB_API_KEY: &str = "stub-api-key";

type QueryPairs = Vec<(String, String)>;

/// Requests observed by the stub.
#[derive(Default)]
pub struct StubLog {
    pub discovery_hits: AtomicUsize,
    pub timeline_queries: Mutex<Vec<QueryPairs>>,
    pub related_queries: Mutex<Vec<(String, QueryPairs)>>,
}

struct StubState {
    addr: SocketAddr,
    timeline: Value,
    log: Arc<StubLog>,
}

/// Running stub server.
pub struct UpstreamStub {
    pub addr: SocketAddr,
    pub log: Arc<StubLog>,
}

impl UpstreamStub {
    /// Start a stub answering timeline calls with `timeline`.
    pub async fn start(timeline: Value) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let log = Arc::new(StubLog::default());

        let state = Arc::new(StubState {
            addr,
            timeline,
            log: log.clone(),
        });

        let app = Router::new()
            .route("/$discovery/rest", get(discovery))
            .route("/v1beta/timelinesForHealth", get(timelines))
            .route("/v1beta/topTopics", get(top_topics))
            .route("/v1beta/topQueries", get(top_queries))
            .with_state(state);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, log }
    }

    /// Start a stub serving the single-line `flu` timeline.
    pub async fn start_flu() -> Self {
        Self::start(flu_timeline()).await
    }

    /// API configuration pointing at this stub.
    pub fn config(&self) -> TrendsApiConfig {
        TrendsApiConfig::new(STUB_API_KEY).with_server_url(format!("http://{}", self.addr))
    }

    pub async fn timeline_queries(&self) -> Vec<QueryPairs> {
        self.log.timeline_queries.lock().await.clone()
    }

    pub fn discovery_hits(&self) -> usize {
        self.log.discovery_hits.load(Ordering::SeqCst)
    }
}

pub fn flu_timeline() -> Value {
    json!({
        "lines": [{
            "term": "flu",
            "points": [
                {"date": "2020-01-01", "value": 10},
                {"date": "2020-01-02", "value": 12}
            ]
        }]
    })
}

/// Values of every occurrence of `name` in a captured query.
pub fn values_of<'a>(pairs: &'a QueryPairs, name: &str) -> Vec<&'a str> {
    pairs
        .iter()
        .filter(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .collect()
}

fn has_valid_key(pairs: &QueryPairs) -> bool {
    values_of(pairs, "key") == vec![STUB_API_KEY]
}

fn rejected_key() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": {"code": 400, "message": "API key not valid"}})),
    )
        .into_response()
}

async fn discovery(State(state): State<Arc<StubState>>) -> Json<Value> {
    state.log.discovery_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "kind": "discovery#restDescription",
        "name": "trends",
        "version": "v1beta",
        "rootUrl": format!("http://{}/", state.addr),
        "servicePath": "",
        "methods": {
            "getTimelinesForHealth": {
                "id": "trends.getTimelinesForHealth",
                "path": "v1beta/timelinesForHealth",
                "httpMethod": "GET"
            },
            "getTopTopics": {
                "id": "trends.getTopTopics",
                "path": "v1beta/topTopics",
                "httpMethod": "GET"
            },
            "getTopQueries": {
                "id": "trends.getTopQueries",
                "path": "v1beta/topQueries",
                "httpMethod": "GET"
            }
        }
    }))
}

async fn timelines(
    State(state): State<Arc<StubState>>,
    Query(pairs): Query<QueryPairs>,
) -> Response {
    let valid = has_valid_key(&pairs);
    state.log.timeline_queries.lock().await.push(pairs);
    if !valid {
        return rejected_key();
    }
    Json(state.timeline.clone()).into_response()
}

async fn top_topics(state: State<Arc<StubState>>, pairs: Query<QueryPairs>) -> Response {
    related("topTopics", state, pairs).await
}

async fn top_queries(state: State<Arc<StubState>>, pairs: Query<QueryPairs>) -> Response {
    related("topQueries", state, pairs).await
}

async fn related(
    operation: &str,
    State(state): State<Arc<StubState>>,
    Query(pairs): Query<QueryPairs>,
) -> Response {
    let valid = has_valid_key(&pairs);
    state
        .log
        .related_queries
        .lock()
        .await
        .push((operation.to_string(), pairs));
    if !valid {
        return rejected_key();
    }
    Json(json!({"item": [{"title": "Influenza", "value": 100}], "operation": operation}))
        .into_response()
}
