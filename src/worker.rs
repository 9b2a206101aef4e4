// Background scrape worker: one metrics cycle per scrape interval until shutdown.
// A cycle that is running when shutdown arrives finishes first, including any
// batch write it started.

use crate::service::MetricsService;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::time::{Duration, interval};
use tracing::Instrument;

/// Cycle counters shared with whoever wants to report them.
#[derive(Debug, Default)]
pub struct WorkerStats {
    pub cycles_completed: AtomicU64,
    pub cycles_failed: AtomicU64,
    pub last_metrics_count: AtomicU64,
}

pub struct WorkerDeps {
    pub service: MetricsService,
    pub stats: Arc<WorkerStats>,
    pub shutdown_rx: tokio::sync::oneshot::Receiver<()>,
}

/// Stats logging uses its own interval, independent of the scrape interval.
pub struct WorkerConfig {
    pub scrape_interval: Duration,
    pub stats_log_interval: Duration,
}

pub fn spawn(deps: WorkerDeps, config: WorkerConfig) -> tokio::task::JoinHandle<()> {
    let WorkerDeps {
        service,
        stats,
        mut shutdown_rx,
    } = deps;
    let WorkerConfig {
        scrape_interval,
        stats_log_interval,
    } = config;

    let worker_span = tracing::span!(
        tracing::Level::DEBUG,
        "worker",
        scrape_interval_ms = scrape_interval.as_millis() as u64
    );

    tokio::spawn(async move {
        let mut tick = interval(scrape_interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // First cycle runs one full interval after start.
        tick.reset();
        let mut stats_log_tick = interval(stats_log_interval);
        stats_log_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => {
                    tracing::debug!("Worker shutting down");
                    break;
                }
                _ = tick.tick() => {
                    match service.get_metrics_list().await {
                        Ok(list) => {
                            stats.cycles_completed.fetch_add(1, Ordering::Relaxed);
                            stats.last_metrics_count.store(list.len() as u64, Ordering::Relaxed);
                            tracing::debug!(
                                operation = "scrape",
                                metrics_count = list.len(),
                                "scrape cycle complete"
                            );
                        }
                        Err(e) => {
                            stats.cycles_failed.fetch_add(1, Ordering::Relaxed);
                            tracing::warn!(
                                error = %e,
                                operation = "scrape",
                                "scrape cycle failed"
                            );
                        }
                    }
                }
                _ = stats_log_tick.tick() => {
                    tracing::info!(
                        cycles_completed = stats.cycles_completed.load(Ordering::Relaxed),
                        cycles_failed = stats.cycles_failed.load(Ordering::Relaxed),
                        last_metrics_count = stats.last_metrics_count.load(Ordering::Relaxed),
                        points_flushed = service.repository().points_flushed(),
                        "agent stats"
                    );
                }
            }
        }
    }
    .instrument(worker_span))
}
