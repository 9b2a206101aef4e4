// Repository tests against a fake backend

mod common;

use common::*;
use stalker::buffer::PointBuffer;
use stalker::influx::{InfluxClient, InfluxParams};
use stalker::repository::{
    InfluxRepository, RepositoryError, RepositoryParams, StatsRepository, new_repository,
};
use stalker::translate::Translator;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

fn influx_repo(url: &str, buffer: PointBuffer) -> InfluxRepository {
    let client = InfluxClient::new(InfluxParams {
        url: url.to_string(),
        token: "secret".into(),
        org: "acme".into(),
        bucket: "metrics".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    InfluxRepository::new(client, Translator::new("host-a"), buffer)
}

fn always_flush() -> PointBuffer {
    PointBuffer::with_policy(Arc::new(|_| true))
}

fn params(url: Option<&str>) -> RepositoryParams {
    RepositoryParams {
        database_url: url.map(str::to_string),
        database_token: String::new(),
        org: "acme".into(),
        bucket: "metrics".into(),
        buffer_duration: Duration::from_secs(60),
        request_timeout: Duration::from_secs(5),
        machine_name: "host-a".into(),
    }
}

#[tokio::test]
async fn test_no_backend_url_selects_memory_repository() {
    for url in [None, Some("")] {
        let repo = new_repository(params(url)).unwrap();
        let info = container("web", vec![sample(ts(0))]);
        repo.post_stats(&info, &info.stats[0]).await.unwrap();
        let list = repo.get_metrics_list().await.unwrap();
        assert_eq!(list.metrics, None);
        assert_eq!(repo.points_flushed(), 0);
    }
}

#[tokio::test]
async fn test_backend_url_selects_influx_repository() {
    let backend = spawn_fake_backend().await;
    let repo = new_repository(params(Some(&backend.url))).unwrap();
    let list = repo.get_metrics_list().await.unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(backend.state.queries.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_post_stats_flushes_tagged_batch() {
    let backend = spawn_fake_backend().await;
    let repo = influx_repo(&backend.url, always_flush());
    let info = container("web", vec![sample(ts(0))]);

    repo.post_stats(&info, &info.stats[0]).await.unwrap();

    let lines = backend.state.written_lines();
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l.contains("machine=host-a")));
    assert!(lines.iter().all(|l| l.contains("container_name=web")));
    assert!(
        lines
            .iter()
            .any(|l| l.starts_with("cpu_usage_total,") && l.contains(" value=100i "))
    );
    assert_eq!(repo.points_flushed(), lines.len() as u64);
    assert_eq!(repo.pending_points(), 0);

    let query = &backend.state.write_queries.lock().unwrap()[0];
    assert_eq!(query.get("org").map(String::as_str), Some("acme"));
    assert_eq!(query.get("bucket").map(String::as_str), Some("metrics"));
    assert_eq!(query.get("precision").map(String::as_str), Some("ns"));
}

#[tokio::test]
async fn test_post_stats_buffers_until_policy_fires() {
    let backend = spawn_fake_backend().await;
    let repo = influx_repo(&backend.url, PointBuffer::with_policy(Arc::new(|_| false)));
    let info = container("web", vec![sample(ts(0)), sample(ts(20))]);

    repo.post_stats(&info, &info.stats[0]).await.unwrap();
    repo.post_stats(&info, &info.stats[1]).await.unwrap();
    assert_eq!(backend.state.write_count(), 0);
    let pending = repo.pending_points();
    assert!(pending > 0);

    repo.override_ready_to_flush(Arc::new(|_| true));
    repo.post_stats(&info, &info.stats[1]).await.unwrap();
    assert_eq!(backend.state.write_count(), 1);
    assert_eq!(repo.pending_points(), 0);
    assert!(backend.state.written_lines().len() > pending);
}

#[tokio::test]
async fn test_write_failure_is_surfaced() {
    let backend = spawn_fake_backend().await;
    backend.state.fail_writes.store(true, Ordering::SeqCst);
    let repo = influx_repo(&backend.url, always_flush());
    let info = container("web", vec![sample(ts(0))]);

    let err = repo.post_stats(&info, &info.stats[0]).await.unwrap_err();
    assert!(matches!(err, RepositoryError::Backend(_)));
    assert!(!err.is_data_shape());
    assert!(err.to_string().contains("write refused"));
    assert_eq!(repo.points_flushed(), 0);
}

#[tokio::test]
async fn test_malformed_sample_is_data_shape_error() {
    let backend = spawn_fake_backend().await;
    let repo = influx_repo(&backend.url, always_flush());
    let info = container("web", vec![malformed_sample(ts(0))]);

    let err = repo.post_stats(&info, &info.stats[0]).await.unwrap_err();
    assert!(err.is_data_shape());
    assert!(err.to_string().contains("web"));
    assert_eq!(backend.state.write_count(), 0);
}

#[tokio::test]
async fn test_get_metrics_list_serializes_records() {
    let backend = spawn_fake_backend().await;
    let repo = influx_repo(&backend.url, always_flush());

    let list = repo.get_metrics_list().await.unwrap();
    let metrics = list.metrics.unwrap();
    assert_eq!(metrics.len(), 2);
    let first: serde_json::Value = serde_json::from_str(&metrics[0]).unwrap();
    assert_eq!(first["_measurement"], "cpu_usage_total");
    assert_eq!(first["_value"], 100);
    assert_eq!(first["container_name"], "web");

    let query = &backend.state.queries.lock().unwrap()[0];
    assert_eq!(query["query"], r#"from(bucket:"metrics") |> range(start:-1m)"#);
}

#[tokio::test]
async fn test_query_failure_is_surfaced() {
    let backend = spawn_fake_backend().await;
    backend.state.fail_queries.store(true, Ordering::SeqCst);
    let repo = influx_repo(&backend.url, always_flush());

    let err = repo.get_metrics_list().await.unwrap_err();
    assert!(err.to_string().contains("query refused"));
}

#[tokio::test]
async fn test_wait_until_ready_against_healthy_backend() {
    let backend = spawn_fake_backend().await;
    let repo = influx_repo(&backend.url, always_flush());
    repo.client()
        .wait_until_ready(Duration::from_secs(2), Duration::from_millis(50))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_wait_until_ready_times_out_when_unreachable() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let repo = influx_repo(&url, always_flush());
    let result = repo
        .client()
        .wait_until_ready(Duration::from_millis(200), Duration::from_millis(50))
        .await;
    assert!(result.is_err());
}
