// One scrape cycle: pull the latest samples from the metrics source, post
// each container's newest sample, then read back the recent metrics list.

use crate::cadvisor::{MetricsSource, SourceError};
use crate::models::{ContainerInfo, ContainerStats, MetricsList};
use crate::repository::{RepositoryError, StatsRepository};
use std::sync::Arc;
use thiserror::Error;
use tracing::instrument;

/// Two samples per container let consumers derive instantaneous rates.
pub const SAMPLES_PER_CONTAINER: u32 = 2;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Most recent sample of `info`, if any.
pub fn latest_container_stats(info: &ContainerInfo) -> Option<&ContainerStats> {
    info.stats.last()
}

#[derive(Clone)]
pub struct MetricsService {
    source: Arc<dyn MetricsSource>,
    repository: Arc<dyn StatsRepository>,
}

impl MetricsService {
    pub fn new(source: Arc<dyn MetricsSource>, repository: Arc<dyn StatsRepository>) -> Self {
        Self { source, repository }
    }

    pub fn repository(&self) -> &Arc<dyn StatsRepository> {
        &self.repository
    }

    /// Run one cycle. Containers without a sample are skipped; a container
    /// whose sample is malformed is logged and skipped. Any source, backend
    /// or read failure aborts the cycle.
    #[instrument(skip(self), fields(operation = "get_metrics_list"))]
    pub async fn get_metrics_list(&self) -> Result<MetricsList, ServiceError> {
        let infos = self
            .source
            .container_infos(SAMPLES_PER_CONTAINER)
            .await?;

        for (name, info) in &infos {
            let Some(stats) = latest_container_stats(info) else {
                tracing::debug!(container = %name, "no sample; skipping");
                continue;
            };
            match self.repository.post_stats(info, stats).await {
                Ok(()) => {}
                Err(e) if e.is_data_shape() => {
                    tracing::warn!(container = %name, error = %e, "malformed stats; skipping container");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(self.repository.get_metrics_list().await?)
    }

    /// Metrics stored between `start` and `end` (unix seconds). Not backed by
    /// a query yet; always empty.
    // TODO: issue a bounded `range(start:, stop:)` query through the repository.
    pub async fn get_metrics_list_in_period(
        &self,
        _start: i64,
        _end: i64,
    ) -> Result<MetricsList, ServiceError> {
        Ok(MetricsList::default())
    }
}
