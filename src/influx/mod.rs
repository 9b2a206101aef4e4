// InfluxDB v2 HTTP client: blocking-style batch writes, the fixed recent-window
// query, and the health probe used at startup.

pub mod line_protocol;
pub mod query;

use crate::models::Point;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

pub use query::Record;

pub const DEFAULT_ORG: &str = "stalker";
pub const DEFAULT_BUCKET: &str = "metrics";

#[derive(Debug, Error)]
pub enum InfluxError {
    #[error("influx request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("influx returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("influx query error: {0}")]
    Query(String),
}

#[derive(Debug, Clone)]
pub struct InfluxParams {
    pub url: String,
    pub token: String,
    pub org: String,
    pub bucket: String,
    pub timeout: Duration,
}

/// Safe to share between writers and readers; every call is independent.
#[derive(Clone)]
pub struct InfluxClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    org: String,
    bucket: String,
}

impl InfluxClient {
    pub fn new(params: InfluxParams) -> Result<Self, InfluxError> {
        let http = reqwest::Client::builder().timeout(params.timeout).build()?;
        Ok(Self {
            http,
            base_url: params.url.trim_end_matches('/').to_string(),
            token: params.token,
            org: params.org,
            bucket: params.bucket,
        })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// The fixed read query: everything in the bucket from the last minute.
    pub fn recent_query(&self) -> String {
        format!(r#"from(bucket:"{}") |> range(start:-1m)"#, self.bucket)
    }

    #[instrument(skip(self, points), fields(backend = "influx", operation = "write_points", points_count = points.len()))]
    pub async fn write_points(&self, points: &[Point]) -> Result<(), InfluxError> {
        if points.is_empty() {
            return Ok(());
        }
        let body = line_protocol::encode(points);
        let resp = self
            .http
            .post(format!("{}/api/v2/write", self.base_url))
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", self.bucket.as_str()),
                ("precision", "ns"),
            ])
            .header(AUTHORIZATION, self.auth_header())
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(body)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "influx", operation = "query_recent"))]
    pub async fn query_recent(&self) -> Result<Vec<Record>, InfluxError> {
        let body = serde_json::json!({
            "query": self.recent_query(),
            "type": "flux",
            "dialect": {
                "header": true,
                "annotations": ["datatype"],
                "delimiter": ",",
            },
        });
        let resp = self
            .http
            .post(format!("{}/api/v2/query", self.base_url))
            .query(&[("org", self.org.as_str())])
            .header(AUTHORIZATION, self.auth_header())
            .header(ACCEPT, "application/csv")
            .json(&body)
            .send()
            .await?;
        let text = check_status(resp).await?.text().await?;
        let records = query::parse_csv(&text)?;
        tracing::debug!(records_count = records.len(), "query returned");
        Ok(records)
    }

    /// `GET /health`; Ok when the backend reports ready.
    pub async fn health(&self) -> Result<(), InfluxError> {
        let resp = self
            .http
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }

    /// Poll `health` until it succeeds or `timeout` elapses.
    pub async fn wait_until_ready(
        &self,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<(), InfluxError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match self.health().await {
                Ok(()) => return Ok(()),
                Err(e) if tokio::time::Instant::now() >= deadline => return Err(e),
                Err(e) => {
                    tracing::debug!(error = %e, "backend not ready yet");
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.token)
    }
}

async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, InfluxError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(InfluxError::Status { status, body })
}
