// Container metrics source: per-container spec + recent stats via the
// source's v2.0 REST API.

use crate::models::{ContainerInfo, ContainerSpec, ContainerStats};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("metrics source request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("metrics source returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Info for every container under the root, recursively, with at most
    /// `count` of the most recent samples each. Keyed by container name.
    async fn container_infos(
        &self,
        count: u32,
    ) -> Result<HashMap<String, ContainerInfo>, SourceError>;
}

#[derive(Clone)]
pub struct CadvisorClient {
    http: reqwest::Client,
    base_url: String,
}

impl CadvisorClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, SourceError> {
        let resp = self
            .http
            .get(format!("{}/api/v2.0/{}/", self.base_url, endpoint))
            .query(query)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Status { status, body });
        }
        Ok(resp.json().await?)
    }
}

#[async_trait]
impl MetricsSource for CadvisorClient {
    #[instrument(skip(self), fields(source = "cadvisor", operation = "container_infos"))]
    async fn container_infos(
        &self,
        count: u32,
    ) -> Result<HashMap<String, ContainerInfo>, SourceError> {
        let base = [
            ("type", "name".to_string()),
            ("recursive", "true".to_string()),
        ];
        let mut specs: HashMap<String, ContainerSpec> = self.get_json("spec", &base).await?;

        let mut stats_query = base.to_vec();
        stats_query.push(("count", count.to_string()));
        let stats: HashMap<String, Vec<ContainerStats>> =
            self.get_json("stats", &stats_query).await?;

        Ok(join_specs_and_stats(&mut specs, stats))
    }
}

/// Pair each container's samples with its spec; containers without a
/// reported spec get a default one.
pub fn join_specs_and_stats(
    specs: &mut HashMap<String, ContainerSpec>,
    stats: HashMap<String, Vec<ContainerStats>>,
) -> HashMap<String, ContainerInfo> {
    stats
        .into_iter()
        .map(|(name, stats)| {
            let spec = specs.remove(&name).unwrap_or_default();
            (name, ContainerInfo { spec, stats })
        })
        .collect()
}
