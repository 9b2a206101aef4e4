// Stats repository: InfluxDB-backed when a backend URL is configured,
// otherwise a no-op in-memory stand-in for running without a backend.

use crate::buffer::{FlushPolicy, PointBuffer};
use crate::influx::{InfluxClient, InfluxError, InfluxParams};
use crate::models::{ContainerInfo, ContainerStats, MetricsList};
use crate::translate::{TranslateError, Translator};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("translate {container}: {source}")]
    Translate {
        container: String,
        #[source]
        source: TranslateError,
    },
    #[error(transparent)]
    Backend(#[from] InfluxError),
    #[error("serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RepositoryError {
    /// Malformed data for a single container, as opposed to a backend failure.
    pub fn is_data_shape(&self) -> bool {
        matches!(self, RepositoryError::Translate { .. })
    }
}

#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Translate one sample and buffer it, delivering a batch if one is due.
    async fn post_stats(
        &self,
        info: &ContainerInfo,
        stats: &ContainerStats,
    ) -> Result<(), RepositoryError>;

    /// Recently stored records, each serialized to a JSON string.
    async fn get_metrics_list(&self) -> Result<MetricsList, RepositoryError>;

    /// Total points handed to the backend so far.
    fn points_flushed(&self) -> u64 {
        0
    }
}

#[derive(Debug, Clone)]
pub struct RepositoryParams {
    /// Backend URL; `None` or empty selects the in-memory repository.
    pub database_url: Option<String>,
    pub database_token: String,
    pub org: String,
    pub bucket: String,
    pub buffer_duration: Duration,
    pub request_timeout: Duration,
    pub machine_name: String,
}

/// Pick the repository implementation once, from configuration.
pub fn new_repository(params: RepositoryParams) -> Result<Arc<dyn StatsRepository>, InfluxError> {
    let url = match params.database_url.as_deref() {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => {
            tracing::info!("no backend configured; using in-memory repository");
            return Ok(Arc::new(MemoryRepository));
        }
    };
    let client = InfluxClient::new(InfluxParams {
        url,
        token: params.database_token,
        org: params.org,
        bucket: params.bucket,
        timeout: params.request_timeout,
    })?;
    Ok(Arc::new(InfluxRepository::new(
        client,
        Translator::new(params.machine_name),
        PointBuffer::new(params.buffer_duration),
    )))
}

pub struct InfluxRepository {
    client: InfluxClient,
    translator: Translator,
    buffer: PointBuffer,
    points_flushed: AtomicU64,
}

impl InfluxRepository {
    pub fn new(client: InfluxClient, translator: Translator, buffer: PointBuffer) -> Self {
        Self {
            client,
            translator,
            buffer,
            points_flushed: AtomicU64::new(0),
        }
    }

    pub fn client(&self) -> &InfluxClient {
        &self.client
    }

    pub fn override_ready_to_flush(&self, ready_to_flush: FlushPolicy) {
        self.buffer.override_ready_to_flush(ready_to_flush);
    }

    pub fn pending_points(&self) -> usize {
        self.buffer.pending_len()
    }
}

#[async_trait]
impl StatsRepository for InfluxRepository {
    async fn post_stats(
        &self,
        info: &ContainerInfo,
        stats: &ContainerStats,
    ) -> Result<(), RepositoryError> {
        let points = self
            .translator
            .container_stats_to_points(&info.spec, stats)
            .map_err(|source| RepositoryError::Translate {
                container: info.spec.display_name().to_string(),
                source,
            })?;

        // Only one appender gets the batch; the write happens outside the lock.
        let Some(batch) = self.buffer.append(points) else {
            return Ok(());
        };
        let n = batch.len();
        self.client.write_points(&batch).await?;
        self.points_flushed.fetch_add(n as u64, Ordering::Relaxed);
        tracing::debug!(operation = "flush", points_count = n, "points flushed");
        Ok(())
    }

    async fn get_metrics_list(&self) -> Result<MetricsList, RepositoryError> {
        let records = self.client.query_recent().await?;
        let metrics = records
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MetricsList::from_metrics(metrics))
    }

    fn points_flushed(&self) -> u64 {
        self.points_flushed.load(Ordering::Relaxed)
    }
}

/// Accepts every write and always reports an empty list.
#[derive(Debug, Default, Clone, Copy)]
pub struct MemoryRepository;

#[async_trait]
impl StatsRepository for MemoryRepository {
    async fn post_stats(
        &self,
        _info: &ContainerInfo,
        _stats: &ContainerStats,
    ) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn get_metrics_list(&self) -> Result<MetricsList, RepositoryError> {
        Ok(MetricsList::default())
    }
}
