// Shared test helpers: sample fixtures, a fake metrics source and a fake
// time-series backend served on an ephemeral local port.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use stalker::cadvisor::{MetricsSource, SourceError};
use stalker::models::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const RECENT_CSV: &str = "#datatype,string,long,dateTime:RFC3339,long,string,string,string\r\n\
,result,table,_time,_value,_field,_measurement,container_name\r\n\
,_result,0,2024-05-01T10:00:00Z,100,value,cpu_usage_total,web\r\n\
,_result,0,2024-05-01T10:00:20Z,180,value,cpu_usage_total,web\r\n";

pub fn ts(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(1_714_557_600 + secs, 0).unwrap()
}

pub fn sample(at: DateTime<Utc>) -> ContainerStats {
    ContainerStats {
        cpu: Some(CpuStats {
            usage: CpuUsage {
                total: 100,
                per_cpu_usage: Some(vec![40, 60]),
                user: 70,
                system: 30,
            },
            load_average: 0,
        }),
        memory: Some(MemoryStats {
            usage: 2048,
            working_set: 1024,
            ..Default::default()
        }),
        ..ContainerStats::at(at)
    }
}

/// A sample whose cpu family is malformed.
pub fn malformed_sample(at: DateTime<Utc>) -> ContainerStats {
    let mut stats = sample(at);
    if let Some(cpu) = stats.cpu.as_mut() {
        cpu.usage.per_cpu_usage = Some(vec![]);
    }
    stats
}

pub fn container(alias: &str, stats: Vec<ContainerStats>) -> ContainerInfo {
    ContainerInfo {
        spec: ContainerSpec {
            aliases: vec![alias.to_string()],
            image: format!("{}:latest", alias),
            has_cpu: true,
            has_memory: true,
            ..Default::default()
        },
        stats,
    }
}

/// Serves a fixed set of container infos and counts calls.
#[derive(Default)]
pub struct FakeSource {
    infos: HashMap<String, ContainerInfo>,
    pub calls: AtomicUsize,
}

impl FakeSource {
    pub fn new(infos: impl IntoIterator<Item = (&'static str, ContainerInfo)>) -> Self {
        Self {
            infos: infos
                .into_iter()
                .map(|(name, info)| (name.to_string(), info))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl MetricsSource for FakeSource {
    async fn container_infos(
        &self,
        _count: u32,
    ) -> Result<HashMap<String, ContainerInfo>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.infos.clone())
    }
}

/// Always fails as if the source answered with a gateway error.
pub struct FailingSource;

#[async_trait]
impl MetricsSource for FailingSource {
    async fn container_infos(
        &self,
        _count: u32,
    ) -> Result<HashMap<String, ContainerInfo>, SourceError> {
        Err(SourceError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            body: "source down".into(),
        })
    }
}

/// What the fake backend has seen, plus switches to make it misbehave.
#[derive(Default)]
pub struct BackendState {
    pub writes: Mutex<Vec<String>>,
    pub write_queries: Mutex<Vec<HashMap<String, String>>>,
    pub queries: Mutex<Vec<serde_json::Value>>,
    pub fail_writes: AtomicBool,
    pub fail_queries: AtomicBool,
}

impl BackendState {
    pub fn written_lines(&self) -> Vec<String> {
        self.writes
            .lock()
            .unwrap()
            .iter()
            .flat_map(|body| body.lines().map(str::to_string).collect::<Vec<_>>())
            .collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

pub struct FakeBackend {
    pub url: String,
    pub state: Arc<BackendState>,
}

pub async fn spawn_fake_backend() -> FakeBackend {
    let state = Arc::new(BackendState::default());
    let app = Router::new()
        .route("/api/v2/write", post(write_handler))
        .route("/api/v2/query", post(query_handler))
        .route("/health", get(|| async { Json(serde_json::json!({"status": "pass"})) }))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeBackend {
        url: format!("http://{}", addr),
        state,
    }
}

async fn write_handler(
    State(state): State<Arc<BackendState>>,
    axum::extract::Query(params): axum::extract::Query<HashMap<String, String>>,
    body: String,
) -> impl IntoResponse {
    if state.fail_writes.load(Ordering::SeqCst) {
        return (StatusCode::SERVICE_UNAVAILABLE, "write refused").into_response();
    }
    state.write_queries.lock().unwrap().push(params);
    state.writes.lock().unwrap().push(body);
    StatusCode::NO_CONTENT.into_response()
}

async fn query_handler(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    if state.fail_queries.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, "query refused").into_response();
    }
    state.queries.lock().unwrap().push(body);
    ([(header::CONTENT_TYPE, "text/csv; charset=utf-8")], RECENT_CSV).into_response()
}

pub const SOURCE_SPEC_JSON: &str = r#"{
    "/docker/abc": {
        "aliases": ["web", "abc"],
        "image": "nginx:1.25",
        "labels": {"tier": "front"},
        "has_cpu": true,
        "has_memory": true
    }
}"#;

pub const SOURCE_STATS_JSON: &str = r#"{
    "/docker/abc": [
        {"timestamp": "2024-05-01T10:00:00Z",
         "cpu": {"usage": {"total": 100, "per_cpu_usage": [40, 60], "user": 70, "system": 30}}},
        {"timestamp": "2024-05-01T10:00:20Z",
         "cpu": {"usage": {"total": 180, "per_cpu_usage": [80, 100], "user": 120, "system": 60}}}
    ],
    "/system.slice": [
        {"timestamp": "2024-05-01T10:00:20Z", "referenced_memory": 4096}
    ]
}"#;

/// Requests seen by the fake metrics source, plus a failure switch.
#[derive(Default)]
pub struct SourceState {
    pub requests: Mutex<Vec<(String, HashMap<String, String>)>>,
    pub fail: AtomicBool,
}

impl SourceState {
    pub fn query_for(&self, path: &str) -> Option<HashMap<String, String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, q)| q.clone())
    }
}

pub struct FakeSourceServer {
    pub url: String,
    pub state: Arc<SourceState>,
}

/// Serves the v2.0 spec and stats endpoints from fixed JSON bodies.
pub async fn spawn_fake_source() -> FakeSourceServer {
    let state = Arc::new(SourceState::default());
    let app = Router::new()
        .route("/api/v2.0/spec/", get(spec_handler))
        .route("/api/v2.0/stats/", get(stats_handler))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeSourceServer {
        url: format!("http://{}", addr),
        state,
    }
}

type SourceQuery = axum::extract::Query<HashMap<String, String>>;

async fn spec_handler(state: State<Arc<SourceState>>, query: SourceQuery) -> axum::response::Response {
    source_response(state, query, "/api/v2.0/spec/", SOURCE_SPEC_JSON)
}

async fn stats_handler(state: State<Arc<SourceState>>, query: SourceQuery) -> axum::response::Response {
    source_response(state, query, "/api/v2.0/stats/", SOURCE_STATS_JSON)
}

fn source_response(
    State(state): State<Arc<SourceState>>,
    axum::extract::Query(params): SourceQuery,
    path: &str,
    body: &'static str,
) -> axum::response::Response {
    state
        .requests
        .lock()
        .unwrap()
        .push((path.to_string(), params));
    if state.fail.load(Ordering::SeqCst) {
        return (StatusCode::BAD_GATEWAY, "upstream unavailable").into_response();
    }
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}
