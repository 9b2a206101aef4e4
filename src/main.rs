use anyhow::{Context, Result};
use stalker::*;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

const BACKEND_READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let machine_name = app_config.machine_name();
    tracing::info!(machine = %machine_name, "starting");

    if let Some(url) = app_config.backend.url.as_deref().filter(|u| !u.is_empty())
        && app_config.backend.ready_timeout_secs > 0
    {
        let probe = influx::InfluxClient::new(influx::InfluxParams {
            url: url.to_string(),
            token: app_config.backend.token.clone(),
            org: app_config.backend.org.clone(),
            bucket: app_config.backend.bucket.clone(),
            timeout: app_config.backend.request_timeout(),
        })?;
        tracing::info!(url, "waiting for backend");
        probe
            .wait_until_ready(
                Duration::from_secs(app_config.backend.ready_timeout_secs),
                BACKEND_READY_POLL_INTERVAL,
            )
            .await
            .context("backend did not become ready")?;
    }

    let repository = repository::new_repository(repository::RepositoryParams {
        database_url: app_config.backend.url.clone(),
        database_token: app_config.backend.token.clone(),
        org: app_config.backend.org.clone(),
        bucket: app_config.backend.bucket.clone(),
        buffer_duration: app_config.backend.buffer_duration(),
        request_timeout: app_config.backend.request_timeout(),
        machine_name,
    })?;
    let source = Arc::new(cadvisor::CadvisorClient::new(
        &app_config.source.url,
        app_config.source.request_timeout(),
    )?);
    let service = service::MetricsService::new(source, repository.clone());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            service,
            stats: Arc::new(worker::WorkerStats::default()),
            shutdown_rx,
        },
        worker::WorkerConfig {
            scrape_interval: Duration::from_secs(app_config.monitoring.scrape_interval_secs),
            stats_log_interval: Duration::from_secs(
                app_config.monitoring.stats_log_interval_secs,
            ),
        },
    );

    let app = routes::app(repository);
    match app_config.server.unix_socket.as_deref() {
        #[cfg(unix)]
        Some(path) => {
            // A socket left behind by a previous run blocks bind.
            let _ = std::fs::remove_file(path);
            let listener = tokio::net::UnixListener::bind(path)
                .with_context(|| format!("bind unix socket {}", path))?;
            tracing::info!("Listening on unix:{}", path);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            let _ = std::fs::remove_file(path);
        }
        #[cfg(not(unix))]
        Some(_) => anyhow::bail!("server.unix_socket is only supported on unix"),
        None => {
            let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    let _ = shutdown_tx.send(());
    let _ = worker_handle.await;
    tracing::info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    tracing::info!("Received shutdown signal");
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    tracing::info!("Received shutdown signal");
}
